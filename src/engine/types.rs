//! Graph description as delivered by the graph-generation endpoint.

use serde::Deserialize;

use super::error::GraphError;

const SAMPLE_GRAPH: &str = include_str!("../../assets/sample_graph.json");

/// Color-coding tag of a node. Unknown tags deserialize to [`Category::Other`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Category {
	/// The topic itself.
	Core,
	/// Needed before the core topic.
	Prerequisite,
	/// Part of the core topic.
	Subtopic,
	/// A practical ability.
	Skill,
	/// Software or library.
	Tool,
	/// Anything unrecognised.
	#[default]
	Other,
}

impl Category {
	/// Every named category, in legend order.
	pub const ALL: [Category; 5] = [
		Category::Core,
		Category::Prerequisite,
		Category::Subtopic,
		Category::Skill,
		Category::Tool,
	];

	/// Fill colour as a CSS hex string.
	pub fn color(self) -> &'static str {
		match self {
			Category::Core => "#3b82f6",
			Category::Prerequisite => "#8b5cf6",
			Category::Subtopic => "#06b6d4",
			Category::Skill => "#10b981",
			Category::Tool => "#f59e0b",
			Category::Other => "#666666",
		}
	}

	/// Legend label.
	pub fn name(self) -> &'static str {
		match self {
			Category::Core => "Core",
			Category::Prerequisite => "Prerequisite",
			Category::Subtopic => "Subtopic",
			Category::Skill => "Skill",
			Category::Tool => "Tool",
			Category::Other => "Other",
		}
	}
}

impl From<String> for Category {
	fn from(tag: String) -> Self {
		match tag.to_ascii_lowercase().as_str() {
			"core" => Category::Core,
			"prerequisite" => Category::Prerequisite,
			"subtopic" => Category::Subtopic,
			"skill" => Category::Skill,
			"tool" => Category::Tool,
			_ => Category::Other,
		}
	}
}

/// Self-reported difficulty of a concept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
	/// No prior knowledge needed.
	Beginner,
	/// Builds on the basics.
	Intermediate,
	/// Needs most of the graph first.
	Advanced,
}

impl Difficulty {
	/// Display name.
	pub fn name(self) -> &'static str {
		match self {
			Difficulty::Beginner => "Beginner",
			Difficulty::Intermediate => "Intermediate",
			Difficulty::Advanced => "Advanced",
		}
	}
}

/// A concept in the learning path.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Unique within the graph; edges refer to it.
	pub id: String,
	/// Human-readable name.
	pub label: String,
	/// Colour-coding tag.
	#[serde(rename = "type", default)]
	pub category: Category,
	/// Estimated hours; drives the rendered radius.
	#[serde(rename = "estimatedHours", alias = "weight", default)]
	pub weight: f64,
	/// One or two sentences shown in the details panel.
	#[serde(default)]
	pub description: String,
	/// Difficulty, when the description has one.
	#[serde(default)]
	pub difficulty: Option<Difficulty>,
}

/// A dependency between two concepts, by id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GraphEdge {
	/// Id of the source node.
	pub source: String,
	/// Id of the target node.
	pub target: String,
}

/// A whole graph description.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	/// Subject the graph was generated for.
	#[serde(default)]
	pub topic: String,
	/// Concepts, in order.
	pub nodes: Vec<GraphNode>,
	/// May name unknown ids; those are dropped at load.
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

/// Header counters shown above the graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphStats {
	/// Number of nodes.
	pub node_count: usize,
	/// Number of edges.
	pub edge_count: usize,
	/// Sum of estimated hours.
	pub total_weight: f64,
}

impl GraphData {
	/// Parses a JSON description.
	pub fn from_json(json: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(json)?)
	}

	/// The bundled "React Server Components" prerequisite graph.
	pub fn sample() -> Result<Self, GraphError> {
		Self::from_json(SAMPLE_GRAPH)
	}

	/// Counters for the page header.
	pub fn stats(&self) -> GraphStats {
		GraphStats {
			node_count: self.nodes.len(),
			edge_count: self.edges.len(),
			total_weight: self.nodes.iter().map(|n| n.weight).sum(),
		}
	}

	/// Looks a node up by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}
