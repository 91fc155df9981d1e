use std::{future::Future, time::Instant};

use common::error::AppError;
use state_machines::core::GuardError;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::state::{received, RequestMachine, Responded, Responding};

/// Drives one request through validation and execution. Validation failures skip
/// execution and respond straight away.
pub(crate) async fn handle<I, T, V, X, F>(
    operation: &'static str,
    validate: V,
    execute: X,
) -> Result<T, AppError>
where
    V: Future<Output = Result<I, AppError>>,
    X: FnOnce(I) -> F,
    F: Future<Output = Result<T, AppError>>,
{
    let span = info_span!("request", operation);
    async move {
        let started = Instant::now();

        let machine = received()
            .validate()
            .map_err(|(_, guard)| map_guard_error("validate", &guard))?;
        debug!("validating request");

        let input = match validate.await {
            Ok(input) => input,
            Err(err) => {
                let machine = machine
                    .respond()
                    .map_err(|(_, guard)| map_guard_error("respond", &guard))?;
                return respond(machine, started, Err(err));
            }
        };

        let machine = machine
            .execute()
            .map_err(|(_, guard)| map_guard_error("execute", &guard))?;
        debug!("executing request");

        let outcome = execute(input).await;

        let machine = machine
            .respond()
            .map_err(|(_, guard)| map_guard_error("respond", &guard))?;
        respond(machine, started, outcome)
    }
    .instrument(span)
    .await
}

fn settle<T>(
    machine: RequestMachine<(), Responding>,
    outcome: &Result<T, AppError>,
) -> Result<Responded, AppError> {
    match outcome {
        Ok(_) => machine
            .succeed()
            .map(|_| Responded::Success)
            .map_err(|(_, guard)| map_guard_error("succeed", &guard)),
        Err(_) => machine
            .fail()
            .map(|_| Responded::Error)
            .map_err(|(_, guard)| map_guard_error("fail", &guard)),
    }
}

fn respond<T>(
    machine: RequestMachine<(), Responding>,
    started: Instant,
    outcome: Result<T, AppError>,
) -> Result<T, AppError> {
    let responded = settle(machine, &outcome)?;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match &outcome {
        Ok(_) => info!(elapsed_ms, outcome = responded.as_str(), "request responded"),
        Err(err) => warn!(
            elapsed_ms,
            outcome = responded.as_str(),
            kind = err.kind(),
            partial = err.is_partial(),
            error = %err,
            "request responded"
        ),
    }
    outcome
}

fn map_guard_error(event: &str, guard: &GuardError) -> AppError {
    AppError::InternalError(format!(
        "invalid request transition during {event}: {guard:?}"
    ))
}
