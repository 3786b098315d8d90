//! Stratified index splits for training and cross-validation.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::ml::ModelError;

fn indices_by_class(labels: &[u8]) -> [Vec<usize>; 2] {
    let mut classes = [Vec::new(), Vec::new()];
    for (i, &y) in labels.iter().enumerate() {
        classes[usize::from(y.min(1))].push(i);
    }
    classes
}

/// Shuffled train/test split that keeps each class's share in both halves.
/// Returns `(train, test)` index lists.
pub fn stratified_split<R: Rng>(
    labels: &[u8],
    test_fraction: f64,
    rng: &mut R,
) -> Result<(Vec<usize>, Vec<usize>), ModelError> {
    let mut train = Vec::new();
    let mut test = Vec::new();

    for mut members in indices_by_class(labels) {
        if members.len() < 2 {
            return Err(ModelError::InsufficientData(format!(
                "each class needs at least 2 samples to split, got {}",
                members.len()
            )));
        }
        members.shuffle(rng);
        let n_test = ((members.len() as f64 * test_fraction).round() as usize)
            .clamp(1, members.len() - 1);
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.shuffle(rng);
    test.shuffle(rng);
    Ok((train, test))
}

/// `k` stratified folds over positions `0..labels.len()`, in order, without
/// shuffling. Each returned list is one fold's held-out positions; class
/// members are dealt out in contiguous blocks whose sizes differ by at most
/// one.
pub fn stratified_folds(labels: &[u8], k: usize) -> Result<Vec<Vec<usize>>, ModelError> {
    if k < 2 {
        return Err(ModelError::InsufficientData(format!("need at least 2 folds, got {k}")));
    }
    let mut folds = vec![Vec::new(); k];

    for members in indices_by_class(labels) {
        if members.len() < k {
            return Err(ModelError::InsufficientData(format!(
                "a class has {} samples, fewer than {k} folds",
                members.len()
            )));
        }
        let base = members.len() / k;
        let extra = members.len() % k;
        let mut start = 0;
        for (fold, bucket) in folds.iter_mut().enumerate() {
            let size = base + usize::from(fold < extra);
            bucket.extend_from_slice(&members[start..start + size]);
            start += size;
        }
    }

    for fold in folds.iter_mut() {
        fold.sort_unstable();
    }
    Ok(folds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn labels() -> Vec<u8> {
        (0..100).map(|i| u8::from(i % 4 == 0)).collect()
    }

    #[test]
    fn test_split_preserves_class_ratio() {
        let y = labels();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (train, test) = stratified_split(&y, 0.2, &mut rng).unwrap();
        assert_eq!(train.len() + test.len(), 100);
        assert_eq!(test.len(), 20);
        let test_pos = test.iter().filter(|&&i| y[i] == 1).count();
        assert_eq!(test_pos, 5);
    }

    #[test]
    fn test_split_is_reproducible_for_a_seed() {
        let y = labels();
        let a = stratified_split(&y, 0.2, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        let b = stratified_split(&y, 0.2, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_folds_partition_all_indices() {
        let y = labels();
        let folds = stratified_folds(&y, 5).unwrap();
        assert_eq!(folds.len(), 5);
        let mut all: Vec<usize> = folds.iter().flatten().copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
        for fold in &folds {
            assert_eq!(fold.iter().filter(|&&i| y[i] == 1).count(), 5);
        }
    }

    #[test]
    fn test_too_few_samples_is_an_error() {
        let y = vec![0, 0, 0, 0, 0, 1, 1];
        assert!(matches!(stratified_folds(&y, 5), Err(ModelError::InsufficientData(_))));
        assert!(matches!(
            stratified_split(&[0, 0, 1], 0.2, &mut ChaCha8Rng::seed_from_u64(1)),
            Err(ModelError::InsufficientData(_))
        ));
    }
}
