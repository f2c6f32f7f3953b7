//! 配方換算：產品 + 係數 → 每單位原料用量

use gel_core::{Coefficients, FabricUsage, MaterialUsage, Product};

/// 用量計算器
pub struct UsageCalculator;

impl UsageCalculator {
    /// 每單位產品的原料用量
    ///
    /// `gel_kg = weight_g / 1000 × gel_fraction`，各原料 = `gel_kg × 係數`。
    pub fn usage_per_unit(product: &Product, coefficients: &Coefficients) -> MaterialUsage {
        coefficients.as_amounts().scaled(product.gel_kg())
    }

    /// 每單位產品的布料用量
    pub fn fabric_per_unit(product: &Product) -> FabricUsage {
        let mut usage = FabricUsage::zero();
        for req in &product.fabrics {
            *usage.get_mut(req.fabric) += req.units_per_product;
        }
        usage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gel_core::{Fabric, Material};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_gorro_usage_with_default_recipe() {
        let gorro = &Product::default_catalog()[0];
        let usage = UsageCalculator::usage_per_unit(gorro, &Coefficients::default());

        // 800 g × 1.0 = 0.8 kg 凝膠
        assert_eq!(usage.acrylamide_kg, Decimal::new(12, 2));
        assert_eq!(usage.glycerin_kg, Decimal::new(36, 2));
        assert_eq!(usage.water_l, Decimal::new(32, 2));
        assert_eq!(usage.photoinitiator_ml, Decimal::new(152, 3));
        assert_eq!(usage.bis_g, Decimal::new(72, 2));
    }

    #[test]
    fn test_gel_fraction_scales_usage() {
        let half = Product::new("x", "X", Decimal::from(1000)).with_gel_fraction(Decimal::new(5, 1));
        let usage = UsageCalculator::usage_per_unit(&half, &Coefficients::default());

        assert_eq!(usage.acrylamide_kg, Decimal::new(75, 3));
    }

    #[test]
    fn test_fabric_per_unit() {
        let gorro = &Product::default_catalog()[0];
        let usage = UsageCalculator::fabric_per_unit(gorro);

        assert_eq!(usage.get(Fabric::GorroNariz), Decimal::ONE);
        assert_eq!(usage.get(Fabric::GorroDetras), Decimal::ONE);
        assert_eq!(usage.get(Fabric::RodilleraM), Decimal::ZERO);
    }

    proptest! {
        #[test]
        fn prop_usage_non_negative_and_linear_in_weight(
            weight in 0u32..5_000,
            factor in 1u32..20,
            coeff in 0u32..10_000,
        ) {
            let coefficients = Coefficients::default().with(Material::Bis, Decimal::new(coeff as i64, 3));
            let base = Product::new("p", "P", Decimal::from(weight));
            let heavier = Product::new("p", "P", Decimal::from(weight * factor));

            let u1 = UsageCalculator::usage_per_unit(&base, &coefficients);
            let u2 = UsageCalculator::usage_per_unit(&heavier, &coefficients);

            for (_, q) in u1.iter() {
                prop_assert!(q >= Decimal::ZERO);
            }
            prop_assert_eq!(u1.scaled(Decimal::from(factor)), u2);
        }

        #[test]
        fn prop_usage_linear_in_each_coefficient(coeff in 0u32..10_000, factor in 1u32..20) {
            let product = Product::new("p", "P", Decimal::from(650));
            let c1 = Coefficients::default().with(Material::Water, Decimal::new(coeff as i64, 3));
            let c2 = c1.with(Material::Water, c1.water_l_per_kg_gel * Decimal::from(factor));

            let u1 = UsageCalculator::usage_per_unit(&product, &c1);
            let u2 = UsageCalculator::usage_per_unit(&product, &c2);

            prop_assert_eq!(u1.water_l * Decimal::from(factor), u2.water_l);
            prop_assert_eq!(u1.glycerin_kg, u2.glycerin_kg);
        }
    }
}
