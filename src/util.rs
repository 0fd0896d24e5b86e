use nalgebra::Vector3;
use rand::Rng;
use std::ops::RangeInclusive;

/// 각 성분이 `range`에서 독립적으로, 균등하게 뽑힌 벡터
pub fn random_vec<R: Rng + ?Sized>(rng: &mut R, range: RangeInclusive<f32>) -> Vector3<f32> {
    Vector3::new(
        rng.gen_range(range.clone()),
        rng.gen_range(range.clone()),
        rng.gen_range(range),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn components_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let v = random_vec(&mut rng, -0.5..=0.5);
            assert!(v.iter().all(|c| (-0.5..=0.5).contains(c)), "{v:?}");
        }
    }

    #[test]
    fn same_seed_gives_same_vectors() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        for _ in 0..16 {
            assert_eq!(random_vec(&mut a, -1.0..=1.0), random_vec(&mut b, -1.0..=1.0));
        }
    }
}
