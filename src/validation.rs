//! Pre-flight validation for sensor and reading input.
//!
//! Parsing and validation are one step: [`check_sensor`] and
//! [`check_reading`] either hand back a typed payload ready for the wire or
//! the full map of field errors. Every field is checked, so a single call
//! reports all of them.

use std::{collections::BTreeMap, fmt};

use crate::{
    api::dto::parse_instant,
    models::{ReadingDraft, ReadingPayload, SensorDraft, SensorPayload},
};

pub const NOME_MIN_LENGTH: usize = 3;
pub const NOME_MAX_LENGTH: usize = 100;
pub const LOCALIZACAO_MIN_LENGTH: usize = 3;
pub const LOCALIZACAO_MAX_LENGTH: usize = 200;
pub const TEMPERATURA_MIN: f64 = -50.0;
pub const TEMPERATURA_MAX: f64 = 100.0;

// ---------------------------------------------------------------------------
// Error map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Nome,
    Localizacao,
    DataHora,
    Temperatura,
    SensorId,
}

impl Field {
    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Nome => "nome",
            Field::Localizacao => "localizacao",
            Field::DataHora => "dataHora",
            Field::Temperatura => "temperatura",
            Field::SensorId => "sensorId",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViolationKind {
    Required,
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidTimestamp,
    /// Text that does not parse to a finite number.
    NotANumber,
    OutOfRange { min: f64, max: f64 },
    /// A sensor id that cannot refer to any sensor (zero or negative).
    InvalidReference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Field → first violated rule. An absent field has no error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<Field, Violation>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&Violation> {
        self.0.get(&field)
    }

    pub fn message(&self, field: Field) -> Option<&str> {
        self.get(field).map(|v| v.message.as_str())
    }

    pub fn kind(&self, field: Field) -> Option<ViolationKind> {
        self.get(field).map(|v| v.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &Violation)> {
        self.0.iter().map(|(field, v)| (*field, v))
    }

    /// Records the violation, if any, and passes the value through.
    fn collect<T>(&mut self, field: Field, checked: Result<T, Violation>) -> Option<T> {
        match checked {
            Ok(value) => Some(value),
            Err(violation) => {
                self.0.insert(field, violation);
                None
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.values().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&violation.message)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: FieldErrors,
}

impl ValidationResult {
    fn from_check<T>(checked: Result<T, FieldErrors>) -> Self {
        let errors = checked.err().unwrap_or_default();
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor
// ---------------------------------------------------------------------------

struct TextRule {
    min: usize,
    max: usize,
    required: &'static str,
    /// Sentence subject used in the length messages.
    subject: &'static str,
}

const NOME_RULE: TextRule = TextRule {
    min: NOME_MIN_LENGTH,
    max: NOME_MAX_LENGTH,
    required: "O nome do sensor é obrigatório.",
    subject: "O nome",
};

const LOCALIZACAO_RULE: TextRule = TextRule {
    min: LOCALIZACAO_MIN_LENGTH,
    max: LOCALIZACAO_MAX_LENGTH,
    required: "A localização é obrigatória.",
    subject: "A localização",
};

impl TextRule {
    fn check(&self, raw: &str) -> Result<String, Violation> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();

        if len == 0 {
            Err(Violation::new(ViolationKind::Required, self.required))
        } else if len < self.min {
            Err(Violation::new(
                ViolationKind::TooShort { min: self.min },
                format!("{} deve ter pelo menos {} caracteres.", self.subject, self.min),
            ))
        } else if len > self.max {
            Err(Violation::new(
                ViolationKind::TooLong { max: self.max },
                format!("{} deve ter no máximo {} caracteres.", self.subject, self.max),
            ))
        } else {
            Ok(trimmed.to_owned())
        }
    }
}

pub fn check_sensor(draft: &SensorDraft) -> Result<SensorPayload, FieldErrors> {
    let mut errors = FieldErrors::default();
    let nome = errors.collect(Field::Nome, NOME_RULE.check(&draft.nome));
    let localizacao = errors.collect(
        Field::Localizacao,
        LOCALIZACAO_RULE.check(&draft.localizacao),
    );

    match (nome, localizacao) {
        (Some(nome), Some(localizacao)) => Ok(SensorPayload { nome, localizacao }),
        _ => Err(errors),
    }
}

pub fn validate_sensor(draft: &SensorDraft) -> ValidationResult {
    ValidationResult::from_check(check_sensor(draft))
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

const SENSOR_ID_MESSAGE: &str = "Um sensor válido deve ser selecionado.";

/// Trimmed, non-blank text or `None`.
fn filled(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn check_data_hora(raw: &Option<String>) -> Result<chrono::DateTime<chrono::Utc>, Violation> {
    let text = filled(raw).ok_or_else(|| {
        Violation::new(ViolationKind::Required, "A data e hora são obrigatórias.")
    })?;
    parse_instant(text)
        .map_err(|_| Violation::new(ViolationKind::InvalidTimestamp, "Data e hora inválidas."))
}

fn check_temperatura(raw: &Option<String>) -> Result<f64, Violation> {
    let text = filled(raw)
        .ok_or_else(|| Violation::new(ViolationKind::Required, "A temperatura é obrigatória."))?;

    let value = text
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            Violation::new(
                ViolationKind::NotANumber,
                "A temperatura deve ser um número válido.",
            )
        })?;

    if !(TEMPERATURA_MIN..=TEMPERATURA_MAX).contains(&value) {
        return Err(Violation::new(
            ViolationKind::OutOfRange {
                min: TEMPERATURA_MIN,
                max: TEMPERATURA_MAX,
            },
            format!(
                "A temperatura deve estar entre {}°C e {}°C.",
                TEMPERATURA_MIN, TEMPERATURA_MAX
            ),
        ));
    }
    Ok(value)
}

fn check_sensor_id(raw: &Option<String>) -> Result<i64, Violation> {
    let text = filled(raw)
        .ok_or_else(|| Violation::new(ViolationKind::Required, SENSOR_ID_MESSAGE))?;
    let id = text
        .parse::<i64>()
        .map_err(|_| Violation::new(ViolationKind::NotANumber, SENSOR_ID_MESSAGE))?;
    if id <= 0 {
        return Err(Violation::new(ViolationKind::InvalidReference, SENSOR_ID_MESSAGE));
    }
    Ok(id)
}

pub fn check_reading(draft: &ReadingDraft) -> Result<ReadingPayload, FieldErrors> {
    let mut errors = FieldErrors::default();
    let data_hora = errors.collect(Field::DataHora, check_data_hora(&draft.data_hora));
    let temperatura = errors.collect(Field::Temperatura, check_temperatura(&draft.temperatura));
    let sensor_id = errors.collect(Field::SensorId, check_sensor_id(&draft.sensor_id));

    match (data_hora, temperatura, sensor_id) {
        (Some(data_hora), Some(temperatura), Some(sensor_id)) => Ok(ReadingPayload {
            data_hora,
            temperatura,
            sensor_id,
        }),
        _ => Err(errors),
    }
}

pub fn validate_reading(draft: &ReadingDraft) -> ValidationResult {
    ValidationResult::from_check(check_reading(draft))
}
