// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Interactive geometry editing

pub mod ghost;
pub mod highlight;
pub mod interaction;
pub mod snap;

pub use ghost::DragSession;
pub use highlight::HighlightController;
pub use interaction::{Command, CursorStyle, InteractionError, InteractionMachine, Mode};
pub use snap::find_snap_target;
