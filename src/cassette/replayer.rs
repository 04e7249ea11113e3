//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Replays interactions from a loaded cassette, serving them per port/method
/// pair either sequentially or by matching input.
pub struct CassetteReplayer {
    /// Per port+method queue of interactions (in order).
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    /// Per port+method flags marking interactions already served.
    consumed: HashMap<PortMethodKey, Vec<bool>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        let consumed = queues
            .iter()
            .map(|(k, q)| (k.clone(), vec![false; q.len()]))
            .collect();
        Self { queues, consumed }
    }

    /// Return the next unserved interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the given
    /// port/method combination, printing a clear error showing what was
    /// requested versus what interactions remain.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> &Interaction {
        self.take(port, method, |_| true)
    }

    /// Return the first unserved interaction for the given port and method
    /// whose recorded input equals `input`.
    ///
    /// Used for ports whose calls may complete out of order, such as
    /// concurrent HTTP requests.
    ///
    /// # Panics
    ///
    /// Panics if no unserved interaction matches.
    pub fn next_matching(
        &mut self,
        port: &str,
        method: &str,
        input: &serde_json::Value,
    ) -> &Interaction {
        self.take(port, method, |i| &i.input == input)
    }

    fn take(
        &mut self,
        port: &str,
        method: &str,
        accept: impl Fn(&Interaction) -> bool,
    ) -> &Interaction {
        let key = PortMethodKey {
            port: port.to_string(),
            method: method.to_string(),
        };

        let Some(queue) = self.queues.get(&key) else {
            let available: Vec<String> = self
                .queues
                .keys()
                .map(|k| format!("{}::{}", k.port, k.method))
                .collect();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        };

        let served = self
            .consumed
            .get_mut(&key)
            .expect("consumed flags must exist");
        let position = queue
            .iter()
            .zip(served.iter())
            .position(|(i, done)| !done && accept(i));
        let Some(position) = position else {
            panic!(
                "Cassette exhausted: none of the {count} interactions for port={port:?} \
                 method={method:?} remain to serve this call. Last interaction was seq={last_seq}.",
                count = queue.len(),
                last_seq = queue.last().map_or(0, |i| i.seq),
            );
        };

        served[position] = true;
        &queue[position]
    }
}
