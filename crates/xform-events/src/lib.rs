//! xform Events
//!
//! Processes one form event end to end: finds the action handler
//! registered for the (control, event) pair, runs it against the
//! data instance, and builds the response describing every bound
//! control's new value plus the updated instance.

mod action;
mod error;
mod event;
mod instance;
mod model;
pub mod ns;
mod resolver;
mod response;

pub use action::{Action, ActionInterpreter};
pub use error::EventError;
pub use event::EventDescriptor;
pub use instance::Instance;
pub use model::Model;
pub use resolver::ControlResolver;
pub use response::ResponseBuilder;

use xform_dom::Document;
use xform_xpath::XPathPool;

/// One event-processing cycle
///
/// Owns the four input documents for the duration of the cycle and
/// the expression pool shared by its components. Nothing persists
/// across cycles.
pub struct EventCore {
    instance: Instance,
    model: Model,
    controls: Document,
    event: EventDescriptor,
    pool: XPathPool,
}

impl EventCore {
    /// Wire up a cycle from parsed input documents
    pub fn new(
        instance: Document,
        model: Document,
        controls: Document,
        event: &Document,
    ) -> Result<Self, EventError> {
        let pool = XPathPool::new();
        Ok(Self {
            instance: Instance::new(instance, pool.clone()),
            model: Model::new(model),
            controls,
            event: EventDescriptor::from_document(event)?,
            pool,
        })
    }

    /// The event being processed
    pub fn event(&self) -> &EventDescriptor {
        &self.event
    }

    /// The pass-through model document
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Run the cycle: resolve, interpret, build the response
    ///
    /// The instance mutation completes before response construction
    /// begins; any failure aborts with no partial output.
    pub fn process(&mut self) -> Result<Document, EventError> {
        tracing::debug!(
            control_id = self.event.source_control_id(),
            event = self.event.name(),
            "processing event"
        );

        let handler = ControlResolver::resolve(
            &self.controls,
            &self.pool,
            self.event.source_control_id(),
            self.event.name(),
        )?;

        let action = Action::classify(&self.controls, handler);
        ActionInterpreter.interpret(&action, &self.controls, &mut self.instance)?;

        ResponseBuilder::build(&self.controls, &self.instance, &self.pool)
    }
}

/// Process one event from raw markup to raw markup
///
/// Convenience wrapper: parses the four inputs, runs a cycle, and
/// serializes the response.
pub fn process_event(
    instance_xml: &str,
    model_xml: &str,
    controls_xml: &str,
    event_xml: &str,
) -> Result<String, EventError> {
    let instance = xform_xml::parse(instance_xml)?;
    let model = xform_xml::parse(model_xml)?;
    let controls = xform_xml::parse(controls_xml)?;
    let event = xform_xml::parse(event_xml)?;

    let mut core = EventCore::new(instance, model, controls, &event)?;
    let response = core.process()?;
    Ok(xform_xml::serialize(&response)?)
}
