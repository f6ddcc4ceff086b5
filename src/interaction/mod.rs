//! Pointer and keyboard interaction.
//!
//! Maps the gestures a host canvas receives onto simulation calls:
//!
//! - dragging a node pins it to the pointer and reheats the simulation
//! - dragging empty space or scrolling changes the [`ViewTransform`]
//! - the reset key restores the identity transform
//!
//! Nothing here touches the DOM; the host translates its events into these
//! calls.

mod drag;
mod view;

pub use drag::{DRAG_ALPHA_TARGET, DragController};
pub use view::{MAX_ZOOM, MIN_ZOOM, ViewTransform};
