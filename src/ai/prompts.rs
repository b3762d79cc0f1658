//! Prompt sent to the generative model.
//!
//! The reply is expected to carry two sections introduced by
//! [`SCRIPT_MARKER`] and [`ANALYSIS_MARKER`]; [`crate::split_response`]
//! relies on the exact marker strings defined here.

use crate::pedido::PedidoRequest;

pub const SCRIPT_MARKER: &str = "SECCION_GUION:";
pub const ANALYSIS_MARKER: &str = "SECCION_ANALISIS:";

/// Fill the coaching template with the user's five answers.
///
/// User text goes in verbatim. Text that happens to contain one of the
/// section markers will confuse the split of the reply.
pub fn build_prompt(req: &PedidoRequest) -> String {
    format!(
        "Actúa como un Coach Ontológico experto en Fernando Flores y Rafael Echeverría.\n\
         Tu tarea es redactar un \"PEDIDO IMPECABLE\" (Speech Act) basado en estos datos.\n\
         \n\
         DATOS DEL PEDIDO:\n\
         1. Oyente: {oyente}\n\
         2. Acción futura: {accion}\n\
         3. Condiciones de Satisfacción (Estándar de calidad): {condiciones}\n\
         4. Factor Tiempo: {tiempo}\n\
         5. Trasfondo (Por qué es importante): {contexto}\n\
         \n\
         ESTRUCTURA DE RESPUESTA:\n\
         Genera dos secciones:\n\
         \n\
         {SCRIPT_MARKER}\n\
         Escribe el guion conversacional exacto, en primera persona, listo para ser hablado o enviado.\n\
         El tono debe ser asertivo pero colaborativo.\n\
         IMPORTANTE: Debe terminar explícitamente buscando la aceptación del otro \
         (Ej: \"¿Puedes comprometerte a esto?\", \"¿Cuento contigo?\").\n\
         \n\
         {ANALYSIS_MARKER}\n\
         Explica brevemente por qué este pedido reduce la incertidumbre, destacando cómo \
         las condiciones de satisfacción evitan malentendidos.\n",
        oyente = req.oyente,
        accion = req.accion,
        condiciones = req.condiciones,
        tiempo = req.tiempo,
        contexto = req.contexto,
    )
}
