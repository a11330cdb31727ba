pub mod interaction;
pub mod scene;
pub mod svg;

pub use interaction::{FocusKind, InteractionState};
pub use scene::{build_scene, Scene, SceneInput};
pub use svg::{render_svg, render_svg_template};
