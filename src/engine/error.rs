//! Engine error types.

/// Failure to turn a graph description into something loadable.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	/// Not valid JSON, or not shaped like a graph.
	#[error("malformed graph description: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Conditions the scheduler reports to its caller instead of starting.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
	/// No drawing surface; the graph stays loaded and the caller may retry.
	#[error("no drawing surface available")]
	SurfaceUnavailable,
}
