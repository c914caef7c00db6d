/// Rounds to two decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Amount including VAT from an amount excluding VAT and a rate in percent.
///
/// The amount excluding VAT is rounded first, as it is stored.
pub fn montant_ttc(montant_ht: f64, taux_tva: f64) -> f64 {
    round2(round2(montant_ht) * (1.0 + taux_tva / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(4.666), 4.67);
        assert_eq!(round2(4.664), 4.66);
        assert_eq!(round2(-1.005 * 10.0), -10.05);
    }

    /// Expect VAT to be applied and rounded
    #[test]
    fn computes_amount_with_vat() {
        assert_eq!(montant_ttc(1000.0, 20.0), 1200.0);
        assert_eq!(montant_ttc(99.99, 5.5), 105.49);
        assert_eq!(montant_ttc(250.0, 0.0), 250.0);
    }

    /// Expect VAT applied to the stored, rounded amount
    #[test]
    fn applies_vat_to_rounded_amount() {
        assert_eq!(round2(10.125), 10.13);
        assert_eq!(montant_ttc(10.125, 20.0), 12.16);
    }
}
