use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A course as supplied by the ingestion step.
///
/// Fields the catalog does not interpret (credits, meeting times, instructor
/// ratings attached by the enrichment job, ...) are kept in `extra` so the stored
/// snapshot round-trips without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code_with_space: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prerequisites: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dept_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructors: Vec<Instructor>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CourseRecord {
    /// Department of the first section; empty when the course has no sections
    pub fn department(&self) -> &str {
        self.sections
            .first()
            .map(|section| section.dept_name.as_str())
            .unwrap_or("")
    }

    /// All instructor names across every section, joined by a single space
    pub fn instructor_names(&self) -> String {
        self.sections
            .iter()
            .flat_map(|section| section.instructors.iter())
            .map(|instructor| instructor.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
