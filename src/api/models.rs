use serde::{Deserialize, Deserializer, Serialize};

use crate::graph::RenderedGraph;

/// Deserialize optional string, treating empty strings as None
fn deserialize_optional_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => Ok(Some(s.to_string())),
    }
}

/// POST /api/get_courses body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSearchRequest {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub items_per_page: Option<usize>,
    #[serde(default)]
    pub start_from: usize,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub term: Option<String>,
}

/// POST /generate_a_list body
#[derive(Debug, Clone, Deserialize)]
pub struct GraphRequest {
    #[serde(rename = "selectedMajorServ")]
    pub department: String,
    #[serde(rename = "selectedCoursesServ", default)]
    pub completed: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub term: Option<String>,
}

/// Graph in the element format the front end's graph renderer consumes
#[derive(Debug, Clone, Serialize)]
pub struct GraphResponse {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub data: NodeData,
    pub classes: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeData {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    pub data: EdgeData,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeData {
    pub source: String,
    pub target: String,
}

impl From<RenderedGraph> for GraphResponse {
    fn from(graph: RenderedGraph) -> Self {
        Self {
            nodes: graph
                .nodes
                .into_iter()
                .map(|node| GraphNode {
                    classes: if node.selected { "selected" } else { "not_selected" },
                    data: NodeData { id: node.id },
                })
                .collect(),
            edges: graph
                .edges
                .into_iter()
                .map(|edge| GraphEdge {
                    data: EdgeData {
                        source: edge.source,
                        target: edge.target,
                    },
                })
                .collect(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub terms: usize,
}
