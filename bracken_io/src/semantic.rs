// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accessibility vocabulary: component classes and gesture sets.

/// The semantic class of a UI component.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Class {
    /// No specific class.
    #[default]
    Unknown,
    /// A button.
    Button,
    /// A checkbox.
    Checkbox,
    /// A text editor.
    Editor,
    /// A radio button.
    RadioButton,
    /// A switch.
    Switch,
}

bitflags::bitflags! {
    /// Gestures supported by a component, derived from its declared
    /// pointer interest.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Gestures: u8 {
        /// The component reacts to clicks.
        const CLICK  = 1 << 0;
        /// The component scrolls.
        const SCROLL = 1 << 1;
    }
}
