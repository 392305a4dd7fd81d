use super::domain::{BehavioralVector, InvalidInput};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Archetypal customer used as a seed for synthetic profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub vector: BehavioralVector,
}

impl Persona {
    pub fn new(name: impl Into<String>, vector: BehavioralVector) -> Self {
        Self {
            name: name.into(),
            vector,
        }
    }
}

/// Read-only, non-empty persona catalog. Iteration order is catalog order and
/// drives how synthetic samples are allocated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonaSet {
    personas: Vec<Persona>,
}

const STANDARD_PERSONAS: [(&str, f64, f64, f64); 10] = [
    ("cautious_saver", 12.0, 20.0, 42_000.0),
    ("budget_family", 25.0, 62.0, 38_500.0),
    ("bargain_hunter", 34.0, 78.0, 51_000.0),
    ("steady_professional", 42.0, 35.0, 86_000.0),
    ("balanced_household", 50.0, 50.0, 64_000.0),
    ("trend_follower", 58.0, 86.0, 57_000.0),
    ("brand_loyalist", 63.0, 28.0, 112_000.0),
    ("affluent_explorer", 78.0, 44.0, 185_000.0),
    ("impulse_buyer", 88.0, 91.0, 47_000.0),
    ("venture_spender", 94.0, 60.0, 310_000.0),
];

impl PersonaSet {
    pub fn new(personas: Vec<Persona>) -> Result<Self, InvalidInput> {
        if personas.is_empty() {
            return Err(InvalidInput::EmptyPersonaSet);
        }
        let mut seen = HashSet::with_capacity(personas.len());
        for persona in &personas {
            persona.vector.validate()?;
            if !seen.insert(persona.name.as_str()) {
                return Err(InvalidInput::DuplicatePersona {
                    name: persona.name.clone(),
                });
            }
        }
        Ok(Self { personas })
    }

    /// Catalog bundled with the simulator.
    pub fn standard() -> Self {
        let personas = STANDARD_PERSONAS
            .iter()
            .map(|(name, risk, market, income)| {
                Persona::new(*name, BehavioralVector::new(*risk, *market, *income))
            })
            .collect();
        Self { personas }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PersonaImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PersonaImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut personas = Vec::new();

        for record in csv_reader.deserialize::<PersonaRow>() {
            let row = record?;
            personas.push(Persona::new(
                row.name,
                BehavioralVector::new(row.risk_seeking, row.market_susceptibility, row.income),
            ));
        }

        Ok(Self::new(personas)?)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Persona> {
        self.personas.iter()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|persona| persona.name == name)
    }
}

impl<'a> IntoIterator for &'a PersonaSet {
    type Item = &'a Persona;
    type IntoIter = std::slice::Iter<'a, Persona>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Deserialize)]
struct PersonaRow {
    name: String,
    risk_seeking: f64,
    market_susceptibility: f64,
    income: f64,
}

#[derive(Debug)]
pub enum PersonaImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Invalid(InvalidInput),
}

impl std::fmt::Display for PersonaImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersonaImportError::Io(err) => write!(f, "failed to read persona catalog: {}", err),
            PersonaImportError::Csv(err) => write!(f, "invalid persona CSV data: {}", err),
            PersonaImportError::Invalid(err) => write!(f, "unusable persona catalog: {}", err),
        }
    }
}

impl std::error::Error for PersonaImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersonaImportError::Io(err) => Some(err),
            PersonaImportError::Csv(err) => Some(err),
            PersonaImportError::Invalid(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PersonaImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for PersonaImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<InvalidInput> for PersonaImportError {
    fn from(err: InvalidInput) -> Self {
        Self::Invalid(err)
    }
}
