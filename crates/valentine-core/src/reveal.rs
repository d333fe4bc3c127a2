//! Page-level mirror of the reveal overlay's visibility.
//!
//! The watcher (a `MutationObserver` on the web side) only calls [`RevealFlag::sync`]
//! with whatever it currently reads; subscribers learn about actual changes.

pub type SubscriptionId = usize;

type Callback = Box<dyn FnMut(bool)>;

#[derive(Default)]
pub struct RevealFlag {
    value: Option<bool>,
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_id: SubscriptionId,
}

impl RevealFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mirrored value; `false` before the first sync.
    pub fn get(&self) -> bool {
        self.value.unwrap_or(false)
    }

    pub fn on_flag_changed(&mut self, callback: impl FnMut(bool) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Feed the observed source value. The first sync always notifies so the
    /// page state matches a flag that was already set before setup.
    pub fn sync(&mut self, observed: bool) -> bool {
        if self.value == Some(observed) {
            return false;
        }
        self.value = Some(observed);
        log::debug!("[reveal] flag -> {}", observed);
        for (_, cb) in self.subscribers.iter_mut() {
            cb(observed);
        }
        true
    }
}
