use quiz_core::model::GameResult;
use tokio::sync::mpsc;
use tracing::debug;

use super::controller::SessionController;
use super::timer::TimerToken;
use crate::error::SessionError;

/// Input coming from whatever front-end drives the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInput {
    Answer(i64),
    Quit,
}

/// Event loop feeding timer firings and user input to a `SessionController`.
///
/// Events are handled one at a time, so the controller never sees a tick
/// while it is processing an answer.
#[derive(Debug)]
pub struct SessionRunner {
    controller: SessionController,
    timers: mpsc::UnboundedReceiver<TimerToken>,
}

impl SessionRunner {
    #[must_use]
    pub fn new(controller: SessionController, timers: mpsc::UnboundedReceiver<TimerToken>) -> Self {
        Self { controller, timers }
    }

    #[must_use]
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Start the session and run it until it completes or is abandoned.
    ///
    /// Returns `None` when the player quit or the input stream closed first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the session cannot start.
    pub async fn run(
        mut self,
        mut inputs: mpsc::Receiver<SessionInput>,
    ) -> Result<Option<GameResult>, SessionError> {
        self.controller.start()?;

        while !self.controller.state().is_finished() {
            tokio::select! {
                Some(token) = self.timers.recv() => self.controller.handle_timer(token),
                input = inputs.recv() => match input {
                    Some(SessionInput::Answer(value)) => {
                        self.controller.submit_answer(Some(value));
                    }
                    Some(SessionInput::Quit) | None => {
                        debug!(game = %self.controller.game_id(), "session abandoned");
                        self.controller.destroy();
                    }
                },
            }
        }

        Ok(self.controller.result().cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::sessions::timer::TokioScheduler;
    use quiz_core::QuestionGenerator;
    use quiz_core::model::{GameId, GameSettings, NumberRange, Operator};

    const SEED: u64 = 99;

    fn settings(time: Option<u32>) -> GameSettings {
        GameSettings::new(
            3,
            NumberRange::new(1, 9).unwrap(),
            vec![Operator::Add, Operator::Multiply],
            time,
        )
        .unwrap()
    }

    fn runner(settings: GameSettings) -> SessionRunner {
        let (scheduler, timers) = TokioScheduler::channel();
        let controller = SessionController::new(
            GameId::from("runner"),
            "Runner",
            settings,
            Box::new(scheduler),
        )
        .with_generator(QuestionGenerator::seeded(SEED));
        SessionRunner::new(controller, timers)
    }

    #[tokio::test(start_paused = true)]
    async fn timed_session_runs_out_without_input() {
        let (_tx, rx) = mpsc::channel(4);
        let result = runner(settings(Some(2))).run(rx).await.unwrap().unwrap();

        assert_eq!(result.score(), 0);
        assert_eq!(result.total(), 3);
        assert!(result.answers().iter().all(|a| a.user_answer().is_none()));
    }

    #[tokio::test(start_paused = true)]
    async fn answers_are_scored_in_order() {
        let settings = settings(Some(5));
        let problems = QuestionGenerator::seeded(SEED)
            .generate_set(&settings)
            .unwrap();

        let (tx, rx) = mpsc::channel(4);
        let task = tokio::spawn(runner(settings).run(rx));
        tx.send(SessionInput::Answer(problems[0].correct_answer()))
            .await
            .unwrap();
        tx.send(SessionInput::Answer(problems[1].correct_answer() + 1))
            .await
            .unwrap();
        tx.send(SessionInput::Answer(problems[2].correct_answer()))
            .await
            .unwrap();

        let result = task.await.unwrap().unwrap().unwrap();
        assert_eq!(result.score(), 2);
        assert_eq!(result.percentage(), 67);
    }

    #[tokio::test(start_paused = true)]
    async fn quit_abandons_the_session() {
        let (tx, rx) = mpsc::channel(4);
        let task = tokio::spawn(runner(settings(None)).run(rx));
        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.send(SessionInput::Quit).await.unwrap();

        assert!(task.await.unwrap().unwrap().is_none());
    }

    #[tokio::test]
    async fn closed_input_stream_abandons_the_session() {
        let (tx, rx) = mpsc::channel(1);
        drop(tx);
        assert!(runner(settings(None)).run(rx).await.unwrap().is_none());
    }
}
