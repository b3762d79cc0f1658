//! Shared text sent by the bot.
//!
//! Keep all user-facing strings in this module so they stay in one place and are
//! easy to update or translate.

use crate::pedido::Field;

pub const HELP_TEXT: &str = "🗣️ <b>Pedidos Impecables</b>\n\
     <i>Basado en la Ontología del Lenguaje (Fernando Flores)</i>\n\
     Un pedido no es un deseo. Es una acción lingüística que coordina acciones futuras.\n\n\
     Envíame el formulario con estos campos, uno por línea:\n\
     1. <b>Oyente</b>: ¿a quién le pides?\n\
     2. <b>Tiempo</b>: ¿para cuándo?\n\
     3. <b>Acción</b>: ¿qué quieres que haga?\n\
     4. <b>Condiciones</b>: ¿cómo sabes que está bien hecho?\n\
     5. <b>Trasfondo</b>: ¿cuál es el quiebre o necesidad? (opcional)\n\n\
     💡 <b>Clave del éxito:</b> las condiciones de satisfacción eliminan la frase \
     'es que yo pensé que...'\n\n\
     <b>Comandos:</b>\n\
     /plantilla - Recibir el formulario en blanco para copiarlo.\n\
     /pedido - Generar el pedido con el formulario escrito en el mismo mensaje.\n\
     /help - Mostrar esta ayuda.";

pub const TEMPLATE_INTRO: &str = "Copia este formulario, complétalo y envíamelo:";

pub const GENERATION_DISABLED: &str =
    "⚠️ La generación está deshabilitada: falta la API KEY (GOOGLE_API_KEY).";

pub const SCRIPT_HEADER: &str = "💬 <b>Tu Guion</b>";
pub const ANALYSIS_HEADER: &str = "🧠 <b>Análisis Ontológico</b> (por qué funciona)";
pub const DOCUMENT_CAPTION: &str = "💾 Guion (.docx)";

/// Warning for a form with empty required fields.
pub fn missing_fields_text(missing: &[Field]) -> String {
    let names: Vec<&str> = missing.iter().map(|f| f.label()).collect();
    format!(
        "⚠️ Para que el pedido sea impecable, necesitas llenar todos los campos \
         (especialmente las condiciones y el tiempo).\nFaltan: {}.",
        names.join(", ")
    )
}
