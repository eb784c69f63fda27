//! Delegation contract for types that embed a machine instance.

use crate::core::State;
use crate::engine::error::MachineError;
use crate::engine::instance::{MachineInstance, Outcome};
use serde_json::Value;

/// Contract for a service type that owns a [`MachineInstance`] and a
/// subject, and wants the machine API on its own surface.
///
/// Implementors provide the three accessors plus [`apply`](Self::apply),
/// the domain step executed as the transition body; the reader and
/// transition methods are then pure delegations. Conformance is checked
/// by the compiler: a type missing a required method does not build.
///
/// # Example
///
/// ```rust
/// use machina::builder::DefinitionBuilder;
/// use machina::engine::{MachineError, MachineHost, MachineInstance};
/// use machina::state_enum;
/// use serde_json::Value;
/// use std::sync::Arc;
///
/// state_enum! {
///     enum JobState {
///         Queued,
///         Running,
///     }
/// }
///
/// #[derive(Default)]
/// struct JobData {
///     started: bool,
/// }
///
/// struct Job {
///     machine: MachineInstance<JobState, JobData>,
///     data: JobData,
/// }
///
/// impl MachineHost for Job {
///     type State = JobState;
///     type Subject = JobData;
///     type Output = ();
///
///     fn state_machine(&self) -> &MachineInstance<JobState, JobData> {
///         &self.machine
///     }
///
///     fn subject(&self) -> &JobData {
///         &self.data
///     }
///
///     fn parts_mut(&mut self) -> (&mut MachineInstance<JobState, JobData>, &mut JobData) {
///         (&mut self.machine, &mut self.data)
///     }
///
///     fn apply(data: &mut JobData, _next: &JobState, _data: &Value) -> Result<(), MachineError> {
///         data.started = true;
///         Ok(())
///     }
/// }
///
/// let definition = Arc::new(
///     DefinitionBuilder::<JobState, JobData>::new()
///         .initial(JobState::Queued)?
///         .state(JobState::Running)?
///         .transition(JobState::Queued, JobState::Running)?
///         .build()?,
/// );
///
/// let mut job = Job {
///     machine: MachineInstance::new(definition),
///     data: JobData::default(),
/// };
///
/// assert_eq!(job.current_state(), &JobState::Queued);
/// job.transition_to(JobState::Running, Value::Null)?;
/// assert!(job.data.started);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait MachineHost {
    type State: State;
    type Subject;
    type Output;

    /// The embedded machine instance.
    fn state_machine(&self) -> &MachineInstance<Self::State, Self::Subject>;

    /// The subject passed to guards and queries.
    fn subject(&self) -> &Self::Subject;

    /// Split borrow of machine and subject for transition execution.
    fn parts_mut(
        &mut self,
    ) -> (
        &mut MachineInstance<Self::State, Self::Subject>,
        &mut Self::Subject,
    );

    /// The domain step run as the transition body: invoked after
    /// guards and before-callbacks, before the state mutation. Its
    /// value becomes the transition's return value; its error aborts
    /// the transition.
    fn apply(
        subject: &mut Self::Subject,
        next: &Self::State,
        data: &Value,
    ) -> Result<Self::Output, MachineError>;

    /// Delegates to [`MachineInstance::current_state`].
    fn current_state(&self) -> &Self::State {
        self.state_machine().current_state()
    }

    /// Delegates to [`MachineInstance::in_state`].
    fn in_state(&self, states: &[Self::State]) -> bool {
        self.state_machine().in_state(states)
    }

    /// Delegates to [`MachineInstance::allowed_transitions`].
    fn allowed_transitions(&self) -> Vec<Self::State> {
        self.state_machine().allowed_transitions(self.subject())
    }

    /// Delegates to [`MachineInstance::can_transition_to`].
    fn can_transition_to(&self, target: &Self::State) -> bool {
        self.state_machine()
            .can_transition_to(self.subject(), target)
    }

    /// Strict transition using [`apply`](Self::apply) as the body.
    fn transition_to(
        &mut self,
        target: Self::State,
        data: Value,
    ) -> Result<Self::Output, MachineError> {
        let next = target.clone();
        let (machine, subject) = self.parts_mut();
        machine.transition_to_with(subject, target, data, |subj, data| {
            Self::apply(subj, &next, data)
        })
    }

    /// Permissive transition using [`apply`](Self::apply) as the body.
    fn try_transition_to(
        &mut self,
        target: Self::State,
        data: Value,
    ) -> Result<Outcome<Self::Output>, MachineError> {
        let next = target.clone();
        let (machine, subject) = self.parts_mut();
        machine.try_transition_to_with(subject, target, data, |subj, data| {
            Self::apply(subj, &next, data)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DefinitionBuilder;
    use crate::core::Pattern;
    use crate::definition::MachineDefinition;
    use serde::{Deserialize, Serialize};
    use std::sync::Arc;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TicketState {
        Open,
        Resolved,
        Closed,
    }

    impl State for TicketState {
        fn name(&self) -> &str {
            match self {
                Self::Open => "Open",
                Self::Resolved => "Resolved",
                Self::Closed => "Closed",
            }
        }
    }

    #[derive(Default)]
    struct TicketData {
        has_resolution: bool,
        applied: Vec<String>,
    }

    struct Ticket {
        machine: MachineInstance<TicketState, TicketData>,
        data: TicketData,
    }

    impl MachineHost for Ticket {
        type State = TicketState;
        type Subject = TicketData;
        type Output = String;

        fn state_machine(&self) -> &MachineInstance<TicketState, TicketData> {
            &self.machine
        }

        fn subject(&self) -> &TicketData {
            &self.data
        }

        fn parts_mut(
            &mut self,
        ) -> (
            &mut MachineInstance<TicketState, TicketData>,
            &mut TicketData,
        ) {
            (&mut self.machine, &mut self.data)
        }

        fn apply(
            data: &mut TicketData,
            next: &TicketState,
            _data: &Value,
        ) -> Result<String, MachineError> {
            data.applied.push(next.name().to_string());
            Ok(format!("applied {}", next.name()))
        }
    }

    fn ticket_definition() -> Arc<MachineDefinition<TicketState, TicketData>> {
        Arc::new(
            DefinitionBuilder::new()
                .initial(TicketState::Open)
                .unwrap()
                .state(TicketState::Resolved)
                .unwrap()
                .state(TicketState::Closed)
                .unwrap()
                .transition(TicketState::Open, TicketState::Resolved)
                .unwrap()
                .transition(TicketState::Resolved, TicketState::Closed)
                .unwrap()
                .guard(Pattern::to(TicketState::Resolved), |d: &TicketData| {
                    d.has_resolution
                })
                .unwrap()
                .build()
                .unwrap(),
        )
    }

    fn new_ticket() -> Ticket {
        Ticket {
            machine: MachineInstance::new(ticket_definition()),
            data: TicketData::default(),
        }
    }

    #[test]
    fn readers_delegate_to_the_instance() {
        let mut ticket = new_ticket();

        assert_eq!(ticket.current_state(), &TicketState::Open);
        assert!(ticket.in_state(&[TicketState::Open]));
        assert!(!ticket.can_transition_to(&TicketState::Resolved));
        assert!(ticket.allowed_transitions().is_empty());

        ticket.data.has_resolution = true;
        assert!(ticket.can_transition_to(&TicketState::Resolved));
        assert_eq!(ticket.allowed_transitions(), vec![TicketState::Resolved]);
    }

    #[test]
    fn transition_to_uses_apply_as_the_body() {
        let mut ticket = new_ticket();
        ticket.data.has_resolution = true;

        let value = ticket
            .transition_to(TicketState::Resolved, Value::Null)
            .unwrap();

        assert_eq!(value, "applied Resolved");
        assert_eq!(ticket.current_state(), &TicketState::Resolved);
        assert_eq!(ticket.data.applied, vec!["Resolved"]);
    }

    #[test]
    fn try_transition_to_rejects_without_applying() {
        let mut ticket = new_ticket();

        let outcome = ticket
            .try_transition_to(TicketState::Resolved, Value::Null)
            .unwrap();

        assert!(outcome.is_rejected());
        assert_eq!(ticket.current_state(), &TicketState::Open);
        assert!(ticket.data.applied.is_empty());
    }
}
