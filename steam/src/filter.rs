use crate::listing::Listing;

/// Inclusive price band. Callers guarantee `min <= max`.
#[derive(Clone, Copy, Debug)]
pub struct PriceBand {
    min: f64,
    max: f64,
}

impl PriceBand {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn accepts(&self, listing: &Listing) -> bool {
        self.min <= listing.price && listing.price <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price: f64) -> Listing {
        Listing {
            name: "Sticker | Test".to_string(),
            price,
            id: None,
            url: String::new(),
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let band = PriceBand::new(1.0, 5.0);
        assert!(band.accepts(&listing(1.0)));
        assert!(band.accepts(&listing(5.0)));
        assert!(band.accepts(&listing(3.3)));
    }

    #[test]
    fn out_of_band_prices_are_rejected() {
        let band = PriceBand::new(1.0, 5.0);
        assert!(!band.accepts(&listing(0.999)));
        assert!(!band.accepts(&listing(5.001)));
    }
}
