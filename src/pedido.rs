use serde::{Deserialize, Serialize};
use std::fmt;

/// The five inputs of an impeccable request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PedidoRequest {
    pub oyente: String,
    pub accion: String,
    pub condiciones: String,
    pub tiempo: String,
    #[serde(default)]
    pub contexto: String,
}

/// Script and analysis produced for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedidoResult {
    pub guion: String,
    pub analisis: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Oyente,
    Tiempo,
    Accion,
    Condiciones,
    Contexto,
}

impl Field {
    /// Form order, matching the numbering shown to the user.
    pub const ALL: [Field; 5] = [
        Field::Oyente,
        Field::Tiempo,
        Field::Accion,
        Field::Condiciones,
        Field::Contexto,
    ];

    /// Fields that must be filled before anything is sent to the model.
    pub const REQUIRED: [Field; 4] = [
        Field::Oyente,
        Field::Accion,
        Field::Condiciones,
        Field::Tiempo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Oyente => "Oyente",
            Field::Tiempo => "Tiempo",
            Field::Accion => "Acción",
            Field::Condiciones => "Condiciones",
            Field::Contexto => "Trasfondo",
        }
    }

    /// Lowercase labels accepted by the form parser.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Oyente => &["oyente", "a quién", "a quien"],
            Field::Tiempo => &["tiempo", "factor tiempo", "plazo"],
            Field::Accion => &["acción", "accion"],
            Field::Condiciones => &[
                "condiciones",
                "condiciones de satisfacción",
                "condiciones de satisfaccion",
            ],
            Field::Contexto => &["trasfondo", "contexto"],
        }
    }

    pub fn from_label(label: &str) -> Option<Field> {
        let key = label.trim().to_lowercase();
        Field::ALL
            .into_iter()
            .find(|field| field.aliases().contains(&key.as_str()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl PedidoRequest {
    pub fn new(
        oyente: impl Into<String>,
        accion: impl Into<String>,
        condiciones: impl Into<String>,
        tiempo: impl Into<String>,
        contexto: impl Into<String>,
    ) -> Self {
        Self {
            oyente: oyente.into(),
            accion: accion.into(),
            condiciones: condiciones.into(),
            tiempo: tiempo.into(),
            contexto: contexto.into(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Oyente => &self.oyente,
            Field::Tiempo => &self.tiempo,
            Field::Accion => &self.accion,
            Field::Condiciones => &self.condiciones,
            Field::Contexto => &self.contexto,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Oyente => &mut self.oyente,
            Field::Tiempo => &mut self.tiempo,
            Field::Accion => &mut self.accion,
            Field::Condiciones => &mut self.condiciones,
            Field::Contexto => &mut self.contexto,
        }
    }

    /// Required fields that are empty after trimming, in form order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| Field::REQUIRED.contains(field))
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }
}

/// Outcome of one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    MissingFields(Vec<Field>),
    Generated(PedidoResult),
}
