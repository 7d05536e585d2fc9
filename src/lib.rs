//! Shadow Layout - a mirror tree that turns layout results into change records
//!
//! A host keeps its view hierarchy mirrored in a [`ShadowTree`]. Style writes
//! and tree edits are forwarded to a layout engine; after each layout pass the
//! tree reports, children first, the nodes whose boxes were added or changed.
//!
//! # Example
//!
//! ```rust
//! use shadow_layout::{run_scene, LayoutConfig};
//!
//! let report = run_scene(
//!     r#"
//!     root = 1
//!     [[nodes]]
//!     tag = 1
//!     children = [2]
//!     style = { width = 100, height = 100 }
//!     [[nodes]]
//!     tag = 2
//!     style = { width = 50, height = 50 }
//!     "#,
//!     &LayoutConfig::default(),
//! )
//! .unwrap();
//!
//! assert!(report.contains("add 2 {top: 0, left: 0, width: 50, height: 50}"));
//! ```

pub mod error;
pub mod layout;
pub mod scene;
pub mod shadow;
pub mod style;
pub mod surface;

pub use error::{ShadowError, TreeError};
pub use layout::{ConstraintEngine, EngineError, LayoutBox, LayoutConfig, LayoutEngine, ManualEngine};
pub use scene::{PassReport, Scene, SceneError};
pub use shadow::{ChangeKind, LayoutChange, NodeTag, ShadowTree};
pub use style::{StyleProperty, StyleValue};
pub use surface::{ElementTable, RenderSurface};

/// Render pass reports as text, one block per pass
pub fn format_reports(reports: &[PassReport]) -> String {
    reports.iter().map(|report| report.to_string()).collect()
}

/// Parse a TOML scene, run it and return the textual report
pub fn run_scene(source: &str, config: &LayoutConfig) -> Result<String, SceneError> {
    let scene = Scene::from_str(source)?;
    let reports = scene.run(config)?;
    Ok(format_reports(&reports))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_scene_without_steps() {
        let report = run_scene(
            "root = 1\n[[nodes]]\ntag = 1\nstyle = { width = 10, height = 20 }",
            &LayoutConfig::default(),
        )
        .unwrap();
        assert_eq!(
            report,
            "# initial\n  add 1 {top: 0, left: 0, width: 10, height: 20}\n"
        );
    }

    #[test]
    fn test_run_scene_reports_parse_errors() {
        let result = run_scene("root = ", &LayoutConfig::default());
        assert!(matches!(result, Err(SceneError::ParseError(_))));
    }
}
