use crate::domain::model::Participant;
use crate::utils::error::Result;

/// File access for uploaded rosters and downloaded exports.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn save_file(
        &self,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Source of uniform randomness for draws and shuffles.
pub trait RandomSource {
    /// A uniformly distributed index in `0..len`. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;

    /// Uniform in-place permutation (Fisher-Yates).
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

/// Notified once for every draw that settles.
pub trait CelebrationHook {
    fn celebrate(&self, winner: &Participant);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoCelebration;

impl CelebrationHook for NoCelebration {
    fn celebrate(&self, _winner: &Participant) {}
}
