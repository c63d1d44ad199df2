//! Handler lookup
//!
//! Joins the incoming (control id, event name) pair against the
//! controls document to find the action element that should run.

use xform_dom::{Document, NodeId};
use xform_xpath::{NodeRef, Variables, XPathPool};

use crate::error::EventError;
use crate::ns;

/// Query locating the handler: an XForms child of the identified
/// control whose `ev:event` attribute names the incoming event.
const HANDLER_QUERY: &str =
    "/xxf:controls//*[@xxf:id = $control-id]/xf:*[@ev:event = $control-name]";

/// Finds the action handler for a (control, event) pair
pub struct ControlResolver;

impl ControlResolver {
    /// Resolve the handler element, failing if there is none
    ///
    /// When more than one handler matches, the first in document
    /// order wins and the ambiguity is logged; authors should keep
    /// (control, event) pairs unique.
    pub fn resolve(
        controls: &Document,
        pool: &XPathPool,
        control_id: &str,
        event_name: &str,
    ) -> Result<NodeId, EventError> {
        let mut variables = Variables::new();
        variables.insert("control-id".to_string(), control_id.to_string());
        variables.insert("control-name".to_string(), event_name.to_string());

        let matches = {
            let expr = pool.checkout(HANDLER_QUERY)?;
            let value = expr.evaluate(controls, &ns::engine_bindings(), &variables)?;
            value.nodes().to_vec()
        };

        if matches.len() > 1 {
            tracing::warn!(
                control_id,
                event_name,
                matches = matches.len(),
                "ambiguous handler lookup, using first match"
            );
        }

        match matches.first() {
            Some(NodeRef::Node(id)) => Ok(*id),
            _ => Err(EventError::ActionNotFound {
                control_id: control_id.to_string(),
                event_name: event_name.to_string(),
            }),
        }
    }
}
