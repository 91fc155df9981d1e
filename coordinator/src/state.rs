use state_machines::state_machine;

state_machine! {
    name: RequestMachine,
    state: RequestState,
    initial: Received,
    states: [Received, Validating, Executing, Responding, RespondedSuccess, RespondedError],
    events {
        validate { transition: { from: Received, to: Validating } }
        execute { transition: { from: Validating, to: Executing } }
        respond {
            transition: { from: Validating, to: Responding }
            transition: { from: Executing, to: Responding }
        }
        succeed { transition: { from: Responding, to: RespondedSuccess } }
        fail { transition: { from: Responding, to: RespondedError } }
    }
}

pub fn received() -> RequestMachine<(), Received> {
    RequestMachine::new(())
}

/// Terminal state a request settled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Responded {
    Success,
    Error,
}

impl Responded {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}
