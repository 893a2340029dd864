//! Command orchestration: load, mutate, save, deliver, clear.

use std::fmt::{Debug, Display};
use std::marker::PhantomData;
use std::sync::Arc;

use event_bus::{DispatchError, EventDispatcher};
use thiserror::Error;

use crate::aggregate::Aggregate;
use crate::error::{RepositoryError, ValidationError};
use crate::repository::Repository;

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult<A: Aggregate, T = ()> {
    /// The aggregate as saved, with its pending events cleared.
    pub aggregate: A,

    /// Whatever the mutation returned.
    pub output: T,

    /// The events that were delivered, in recording order.
    pub events: Vec<A::Event>,
}

/// Errors that can occur while executing a command.
#[derive(Debug, Error)]
pub enum CommandError<I, X = ValidationError> {
    /// No aggregate exists with the given identity. Nothing was mutated.
    #[error("{aggregate_type} with ID {id} not found.")]
    NotFound { aggregate_type: &'static str, id: I },

    /// The mutation rejected the command. Nothing was saved or delivered.
    #[error("{0}")]
    Rejected(X),

    /// Loading or saving failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The aggregate was saved but event delivery failed.
    #[error(transparent)]
    Delivery(#[from] DispatchError),
}

/// Failure of the save/deliver half of a command.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Delivery(#[from] DispatchError),
}

impl<I, X> From<CommitError> for CommandError<I, X> {
    fn from(err: CommitError) -> Self {
        match err {
            CommitError::Repository(e) => CommandError::Repository(e),
            CommitError::Delivery(e) => CommandError::Delivery(e),
        }
    }
}

/// Saves `aggregate`, delivers its pending events, then clears them.
///
/// Returns the delivered events. If delivery fails the save is not undone and
/// the pending events are left in place.
pub fn commit<A, R>(
    repository: &R,
    dispatcher: &EventDispatcher<A::Event>,
    aggregate: &mut A,
) -> Result<Vec<A::Event>, CommitError>
where
    A: Aggregate,
    R: Repository<A> + ?Sized,
{
    repository.save(aggregate)?;
    tracing::debug!(
        aggregate_type = A::aggregate_type(),
        id = %aggregate.id(),
        "aggregate saved"
    );

    let events = aggregate.events();
    dispatcher.dispatch(&events)?;
    tracing::debug!(
        aggregate_type = A::aggregate_type(),
        id = %aggregate.id(),
        count = events.len(),
        "events delivered"
    );

    aggregate.clear_events();
    Ok(events)
}

/// Saves two aggregates, then delivers their pending events in one dispatch,
/// `first`'s before `second`'s.
///
/// Nothing is delivered unless both saves succeed. If delivery fails both
/// saves stand and both buffers are left in place.
pub fn commit_both<A, B, RA, RB>(
    first: (&RA, &mut A),
    second: (&RB, &mut B),
    dispatcher: &EventDispatcher<A::Event>,
) -> Result<Vec<A::Event>, CommitError>
where
    A: Aggregate,
    B: Aggregate<Event = A::Event>,
    RA: Repository<A> + ?Sized,
    RB: Repository<B> + ?Sized,
{
    let (first_repository, first) = first;
    let (second_repository, second) = second;

    first_repository.save(first)?;
    second_repository.save(second)?;
    tracing::debug!(
        first = %first.id(),
        second = %second.id(),
        "aggregates saved"
    );

    let mut events = first.events();
    events.extend(second.events());
    dispatcher.dispatch(&events)?;
    tracing::debug!(count = events.len(), "events delivered");

    first.clear_events();
    second.clear_events();
    Ok(events)
}

/// Runs use cases against one aggregate type.
///
/// Holds the repository and the shared dispatcher; both are injected by the
/// composition root.
pub struct CommandHandler<A, R>
where
    A: Aggregate,
    R: Repository<A>,
{
    repository: R,
    dispatcher: Arc<EventDispatcher<A::Event>>,
    _phantom: PhantomData<A>,
}

impl<A, R> CommandHandler<A, R>
where
    A: Aggregate,
    R: Repository<A>,
{
    /// Creates a new command handler.
    pub fn new(repository: R, dispatcher: Arc<EventDispatcher<A::Event>>) -> Self {
        Self {
            repository,
            dispatcher,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns a reference to the shared dispatcher.
    pub fn dispatcher(&self) -> &Arc<EventDispatcher<A::Event>> {
        &self.dispatcher
    }

    /// Loads an aggregate, returning None if it doesn't exist.
    pub fn load(&self, id: A::Id) -> Result<Option<A>, RepositoryError> {
        self.repository.get(id)
    }

    /// Loads an aggregate and projects it, never mutating or saving.
    pub fn query<T>(
        &self,
        id: A::Id,
        projection: impl FnOnce(&A) -> T,
    ) -> Result<Option<T>, RepositoryError> {
        Ok(self.load(id)?.as_ref().map(projection))
    }

    /// Executes a mutation against a stored aggregate.
    ///
    /// The aggregate is loaded, handed to `mutation`, then saved, its events
    /// delivered and its buffer cleared. A missing aggregate or a rejected
    /// mutation stops before anything is saved.
    #[tracing::instrument(skip(self, mutation), fields(aggregate_type = A::aggregate_type()))]
    pub fn execute<T, X, F>(
        &self,
        id: A::Id,
        mutation: F,
    ) -> Result<CommandResult<A, T>, CommandError<A::Id, X>>
    where
        X: Display,
        F: FnOnce(&mut A) -> Result<T, X>,
    {
        let started = std::time::Instant::now();

        let Some(mut aggregate) = self.repository.get(id)? else {
            tracing::debug!("aggregate not found");
            return Err(CommandError::NotFound {
                aggregate_type: A::aggregate_type(),
                id,
            });
        };

        let output = match mutation(&mut aggregate) {
            Ok(output) => output,
            Err(rejection) => {
                tracing::warn!(reason = %rejection, "command rejected");
                metrics::counter!("commands_rejected_total").increment(1);
                return Err(CommandError::Rejected(rejection));
            }
        };

        let events = commit(&self.repository, &*self.dispatcher, &mut aggregate)?;

        metrics::counter!("commands_executed_total").increment(1);
        metrics::histogram!("command_duration_seconds").record(started.elapsed().as_secs_f64());

        Ok(CommandResult {
            aggregate,
            output,
            events,
        })
    }

    /// Stores a freshly constructed aggregate and delivers its creation
    /// events.
    #[tracing::instrument(
        skip_all,
        fields(aggregate_type = A::aggregate_type(), id = %aggregate.id())
    )]
    pub fn create(&self, mut aggregate: A) -> Result<CommandResult<A>, CommandError<A::Id>> {
        let events = commit(&self.repository, &*self.dispatcher, &mut aggregate)?;
        metrics::counter!("commands_executed_total").increment(1);

        Ok(CommandResult {
            aggregate,
            output: (),
            events,
        })
    }
}

impl<A, R> Debug for CommandHandler<A, R>
where
    A: Aggregate,
    R: Repository<A> + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler")
            .field("aggregate_type", &A::aggregate_type())
            .field("repository", &self.repository)
            .finish()
    }
}
