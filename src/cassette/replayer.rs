//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Per port/method queues of recorded interactions, ordered by `seq`.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Index a loaded cassette for replay.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut ordered = cassette.interactions.clone();
        ordered.sort_by_key(|i| i.seq);

        let mut queues: HashMap<_, VecDeque<_>> = HashMap::new();
        for interaction in ordered {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction);
        }
        Self { queues }
    }

    /// Take the next recorded interaction for `port`/`method`.
    ///
    /// # Errors
    ///
    /// Returns a description of what was recorded when nothing is left for
    /// the pair.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<Interaction, String> {
        let key = (port.to_owned(), method.to_owned());
        match self.queues.get_mut(&key) {
            Some(queue) => queue.pop_front().ok_or_else(|| {
                format!("Cassette exhausted: every {port}::{method} interaction has been replayed")
            }),
            None => {
                let mut recorded: Vec<String> =
                    self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
                recorded.sort();
                Err(format!(
                    "Cassette exhausted: no interactions recorded for {port}::{method} \
                     (recorded: [{}])",
                    recorded.join(", ")
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), commit: "abc".into(), interactions }
    }

    fn generate(seq: u64, payload: &str) -> Interaction {
        Interaction {
            seq,
            port: "image_generator".into(),
            method: "generate".into(),
            input: json!({"variant": seq}),
            output: json!({"Ok": payload}),
        }
    }

    #[test]
    fn serves_in_seq_order_regardless_of_file_order() {
        let mut replayer =
            CassetteReplayer::new(&cassette(vec![generate(1, "c2Vjb25k"), generate(0, "Zmlyc3Q=")]));

        let first = replayer.next_interaction("image_generator", "generate").unwrap();
        assert_eq!(first.output["Ok"], "Zmlyc3Q=");
        let second = replayer.next_interaction("image_generator", "generate").unwrap();
        assert_eq!(second.seq, 1);
    }

    #[test]
    fn exhausted_pair_errors() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![generate(0, "Zmlyc3Q=")]));

        assert!(replayer.next_interaction("image_generator", "generate").is_ok());
        let err = replayer.next_interaction("image_generator", "generate").unwrap_err();
        assert!(err.contains("Cassette exhausted"));
    }

    #[test]
    fn unknown_pair_lists_what_was_recorded() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![generate(0, "Zmlyc3Q=")]));

        let err = replayer.next_interaction("credit", "sync").unwrap_err();
        assert!(err.contains("no interactions recorded for credit::sync"));
        assert!(err.contains("image_generator::generate"));
    }
}
