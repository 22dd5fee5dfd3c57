use rand::Rng;
use uuid::{Uuid, Variant, Version};

pub fn make_uuid<R: Rng>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.random())
        .with_variant(Variant::RFC4122)
        .with_version(Version::Random)
        .into_uuid()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use super::*;

    #[test]
    fn generated_uuids_are_random_v4() {
        let mut rng = StdRng::seed_from_u64(7);
        let uuid = make_uuid(&mut rng);
        assert_eq!(uuid.get_version(), Some(Version::Random));
        assert_eq!(uuid.get_variant(), Variant::RFC4122);
        assert_ne!(uuid, make_uuid(&mut rng));
    }
}
