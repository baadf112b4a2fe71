// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key events, filters, focus directions and the editor protocol.

use alloc::borrow::Cow;
use alloc::string::String;

use kurbo::Point;

/// The identifier of a keyboard key.
///
/// Letters use their upper-case form; the shift modifier is taken into
/// account by the platform when naming the key, all other modifiers are
/// ignored. Special keys use the associated constants below.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Name(pub Cow<'static, str>);

impl Name {
    /// The left arrow key.
    pub const LEFT_ARROW: Self = Self::of("←");
    /// The right arrow key.
    pub const RIGHT_ARROW: Self = Self::of("→");
    /// The up arrow key.
    pub const UP_ARROW: Self = Self::of("↑");
    /// The down arrow key.
    pub const DOWN_ARROW: Self = Self::of("↓");
    /// The return key.
    pub const RETURN: Self = Self::of("⏎");
    /// The keypad enter key.
    pub const ENTER: Self = Self::of("⌤");
    /// The escape key.
    pub const ESCAPE: Self = Self::of("⎋");
    /// The home key.
    pub const HOME: Self = Self::of("⇱");
    /// The end key.
    pub const END: Self = Self::of("⇲");
    /// The backward delete (backspace) key.
    pub const DELETE_BACKWARD: Self = Self::of("⌫");
    /// The forward delete key.
    pub const DELETE_FORWARD: Self = Self::of("⌦");
    /// The page-up key.
    pub const PAGE_UP: Self = Self::of("⇞");
    /// The page-down key.
    pub const PAGE_DOWN: Self = Self::of("⇟");
    /// The tab key.
    pub const TAB: Self = Self::of("Tab");
    /// The space bar.
    pub const SPACE: Self = Self::of("Space");

    /// A name from a static string.
    pub const fn of(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

bitflags::bitflags! {
    /// A set of active key modifiers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// The control key.
        const CTRL    = 1 << 0;
        /// The command key found on Apple keyboards.
        const COMMAND = 1 << 1;
        /// The shift key.
        const SHIFT   = 1 << 2;
        /// The alt (option) key.
        const ALT     = 1 << 3;
        /// The logo ("super") key.
        const SUPER   = 1 << 4;
    }
}

/// The state of a key during an event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// The key was pressed.
    #[default]
    Pressed,
    /// The key was released.
    Released,
}

/// A key press or release. For text input use [`EditEvent`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Name of the key.
    pub name: Name,
    /// The set of active modifiers when the key changed state.
    pub modifiers: Modifiers,
    /// The state of the key.
    pub state: KeyState,
}

/// Matches [`KeyEvent`]s by name and modifier sets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyFilter {
    /// Name of the key to match. `None` matches every name.
    pub name: Option<Name>,
    /// Modifiers that must be present in matched events.
    pub required: Modifiers,
    /// Modifiers that may be present in matched events.
    pub optional: Modifiers,
}

impl KeyFilter {
    /// A filter matching a bare key by name.
    pub const fn named(name: Name) -> Self {
        Self {
            name: Some(name),
            required: Modifiers::empty(),
            optional: Modifiers::empty(),
        }
    }

    /// Whether `event` matches this filter.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if let Some(name) = &self.name
            && *name != event.name
        {
            return false;
        }
        if !event.modifiers.contains(self.required) {
            return false;
        }
        (event.modifiers - (self.required | self.optional)).is_empty()
    }
}

/// Generated when a handler gains or loses focus.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FocusEvent {
    /// Whether the handler is now focused.
    pub focused: bool,
}

/// A range of text in rune positions, such as an editor's selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Range {
    /// Inclusive start of the range.
    pub start: usize,
    /// Exclusive end of the range.
    pub end: usize,
}

impl Range {
    /// The range with `start <= end`.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.end < self.start {
            Self {
                start: self.end,
                end: self.start,
            }
        } else {
            self
        }
    }

    /// Whether the normalized ranges overlap.
    pub fn overlaps(self, other: Self) -> bool {
        let a = self.normalized();
        let b = other.normalized();
        a.start < b.end && b.start < a.end
    }
}

/// A snippet of text content communicated between an editor and an input
/// method.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Snippet {
    /// The rune range the snippet covers.
    pub range: Range,
    /// The covered text.
    pub text: String,
}

/// The position of a caret.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Caret {
    /// Intersection point of the caret and its baseline.
    pub pos: Point,
    /// Length of the caret above its baseline.
    pub ascent: f64,
    /// Length of the caret below its baseline.
    pub descent: f64,
}

/// Requests an edit from the focused handler, issued by an input method.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EditEvent {
    /// The range to replace with [`EditEvent::text`].
    pub range: Range,
    /// The replacement text.
    pub text: String,
}

/// Generated when an input method changes the selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectionEvent(pub Range);

/// Generated when an input method updates the snippet range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SnippetEvent(pub Range);

/// Hints the kind of data a text editor expects, so an on-screen keyboard
/// can adapt.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputHint {
    /// Any input.
    #[default]
    Any,
    /// Free-form text; auto-correction may be active.
    Text,
    /// Numeric input.
    Numeric,
    /// An email address.
    Email,
    /// A URL.
    Url,
    /// A telephone number.
    Telephone,
    /// A password; auto-correction should be off.
    Password,
}

/// Whether the platform text input connection should open, close, or stay
/// as it is. Edge-triggered: the router reports a value once and then
/// reverts to [`TextInputState::Keep`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextInputState {
    /// Leave the text input connection as it is.
    #[default]
    Keep,
    /// Close the text input connection.
    Close,
    /// Open the text input connection.
    Open,
}

/// Direction of a focus move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FocusDirection {
    /// Move left within the focus row.
    Left,
    /// Move right within the focus row.
    Right,
    /// Move to the nearest handler in the row above.
    Up,
    /// Move to the nearest handler in the row below.
    Down,
    /// Move forward in declaration order (Tab).
    Forward,
    /// Move backward in declaration order (Shift+Tab).
    Backward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_unnamed_matches_any_key() {
        let f = KeyFilter::default();
        let e = KeyEvent {
            name: Name::TAB,
            ..KeyEvent::default()
        };
        assert!(f.matches(&e));
    }

    #[test]
    fn filter_rejects_missing_required_modifier() {
        let f = KeyFilter {
            name: Some(Name::of("A")),
            required: Modifiers::CTRL,
            optional: Modifiers::empty(),
        };
        let plain = KeyEvent {
            name: Name::of("A"),
            ..KeyEvent::default()
        };
        assert!(!f.matches(&plain));
        let ctrl = KeyEvent {
            name: Name::of("A"),
            modifiers: Modifiers::CTRL,
            ..KeyEvent::default()
        };
        assert!(f.matches(&ctrl));
    }

    #[test]
    fn filter_rejects_extraneous_modifier() {
        let f = KeyFilter::named(Name::SPACE);
        let e = KeyEvent {
            name: Name::SPACE,
            modifiers: Modifiers::ALT,
            ..KeyEvent::default()
        };
        assert!(!f.matches(&e));
        let f = KeyFilter {
            optional: Modifiers::ALT,
            ..KeyFilter::named(Name::SPACE)
        };
        assert!(f.matches(&e));
    }

    #[test]
    fn range_overlap_is_order_independent() {
        let a = Range { start: 2, end: 6 };
        let b = Range { start: 5, end: 3 };
        assert!(a.overlaps(b));
        assert!(b.overlaps(a));
        let c = Range { start: 6, end: 9 };
        assert!(!a.overlaps(c));
    }

    #[test]
    fn range_overlap_includes_containment() {
        let inner = Range { start: 4, end: 6 };
        let outer = Range { start: 0, end: 10 };
        assert!(inner.overlaps(outer));
        assert!(outer.overlaps(inner));
    }
}
