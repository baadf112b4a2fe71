// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window-manager actions attachable to scene areas.

bitflags::bitflags! {
    /// Actions the platform window system can perform when the user
    /// interacts with an area, such as dragging a custom title bar.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Actions: u8 {
        /// Start an interactive window move.
        const MOVE       = 1 << 0;
        /// Minimize the window.
        const MINIMIZE   = 1 << 1;
        /// Maximize the window.
        const MAXIMIZE   = 1 << 2;
        /// Restore a maximized window.
        const UNMAXIMIZE = 1 << 3;
        /// Make the window fullscreen.
        const FULLSCREEN = 1 << 4;
        /// Close the window.
        const CLOSE      = 1 << 5;
    }
}
