// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collaborator interfaces the monitor pushes results into.

use crate::style::StyleRules;

/// Declarative styling renderer.
pub trait StyleRenderer {
    /// Replace the active rule set.
    fn apply_style(&mut self, rules: &StyleRules);
}

/// Receives the base IDs rewritten by a poll cycle.
pub trait ChangeNotifier {
    fn notify_changed(&mut self, changed: &[String]);
}

/// Shows one building's text at a time.
pub trait Presenter {
    fn present(&mut self, id: &str, text: &str);
    fn retire(&mut self, id: &str);
}

/// Collaborators touched by a completed cycle.
pub struct Sinks<'a> {
    pub renderer: &'a mut dyn StyleRenderer,
    pub notifier: &'a mut dyn ChangeNotifier,
    pub presenter: &'a mut dyn Presenter,
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StyleRenderer for NullSink {
    fn apply_style(&mut self, _rules: &StyleRules) {}
}

impl ChangeNotifier for NullSink {
    fn notify_changed(&mut self, _changed: &[String]) {}
}

impl Presenter for NullSink {
    fn present(&mut self, _id: &str, _text: &str) {}
    fn retire(&mut self, _id: &str) {}
}
