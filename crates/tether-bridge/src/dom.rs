//! DOM access needed for focus requests.

use crate::error::Result;

/// The slice of the document API the bridge uses.
pub trait Dom {
    /// Element handle. Equality is element identity.
    type Node: Clone + PartialEq;

    /// All elements matching a CSS selector, in document order.
    ///
    /// A selector the document cannot parse is an error.
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self::Node>>;

    /// The element that currently has focus, if any.
    fn active_element(&self) -> Option<Self::Node>;

    fn focus(&self, node: &Self::Node) -> Result<()>;
}

/// What a focus request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    /// The single match received focus
    Focused,
    /// The single match already had focus
    AlreadyFocused,
    /// Nothing matched
    NoMatch,
    /// More than one element matched; focus is left alone
    Ambiguous(usize),
}

/// Focus the element matching `selector` if it is the only match and is not
/// already focused.
///
/// Zero or several matches are not errors; focus requests are advisory.
pub fn focus_unique<D: Dom>(dom: &D, selector: &str) -> Result<FocusOutcome> {
    let mut matches = dom.query_selector_all(selector)?;

    match matches.len() {
        0 => Ok(FocusOutcome::NoMatch),
        1 => {
            let Some(node) = matches.pop() else {
                return Ok(FocusOutcome::NoMatch);
            };
            if dom.active_element().as_ref() == Some(&node) {
                return Ok(FocusOutcome::AlreadyFocused);
            }
            dom.focus(&node)?;
            Ok(FocusOutcome::Focused)
        }
        n => Ok(FocusOutcome::Ambiguous(n)),
    }
}

/// A document with no elements. Every focus request is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDom;

impl Dom for NoDom {
    type Node = ();

    fn query_selector_all(&self, _selector: &str) -> Result<Vec<()>> {
        Ok(Vec::new())
    }

    fn active_element(&self) -> Option<()> {
        None
    }

    fn focus(&self, _node: &()) -> Result<()> {
        Ok(())
    }
}
