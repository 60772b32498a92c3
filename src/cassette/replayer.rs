//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Replays a cassette, keeping a separate queue per port/method pair so that
/// interleaved calls to different ports do not disturb each other.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
    served: Option<Interaction>,
}

impl CassetteReplayer {
    /// Index the interactions of a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues, served: None }
    }

    /// Return the next unserved interaction for `port`/`method`.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was recorded for the pair or every
    /// recorded interaction has already been served.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<&Interaction, String> {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            return Err(format!(
                "Cassette has no interactions recorded for {port}::{method}. \
                 Available: [{}]",
                available.join(", ")
            ));
        };

        let interaction = queue.pop_front().ok_or_else(|| {
            format!("Cassette exhausted: every {port}::{method} interaction has been replayed")
        })?;
        Ok(&*self.served.insert(interaction))
    }
}
