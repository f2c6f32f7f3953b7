//! 布料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 布料裁片類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Fabric {
    /// 頭套前片（鼻）
    GorroNariz,
    /// 頭套後片
    GorroDetras,
    /// 護膝 M
    RodilleraM,
    /// 護膝 XL
    RodilleraXl,
}

impl Fabric {
    pub const ALL: [Fabric; 4] = [
        Fabric::GorroNariz,
        Fabric::GorroDetras,
        Fabric::RodilleraM,
        Fabric::RodilleraXl,
    ];

    /// 缺料訊息使用的名稱
    pub fn name(self) -> &'static str {
        match self {
            Fabric::GorroNariz => "Tela gorro nariz",
            Fabric::GorroDetras => "Tela gorro detrás",
            Fabric::RodilleraM => "Tela rodillera M",
            Fabric::RodilleraXl => "Tela rodillera XL",
        }
    }

    /// 帶單位的顯示名稱
    pub fn label(self) -> &'static str {
        match self {
            Fabric::GorroNariz => "Tela gorro nariz (unid.)",
            Fabric::GorroDetras => "Tela gorro detrás (unid.)",
            Fabric::RodilleraM => "Tela rodillera M (unid.)",
            Fabric::RodilleraXl => "Tela rodillera XL (unid.)",
        }
    }

    /// 採購時所屬的布捲
    pub fn roll(self) -> FabricRoll {
        match self {
            Fabric::GorroNariz | Fabric::GorroDetras => FabricRoll::Gorro,
            Fabric::RodilleraM | Fabric::RodilleraXl => FabricRoll::Rodillera,
        }
    }
}

impl std::fmt::Display for Fabric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// 布捲（以公斤採購）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FabricRoll {
    /// 頭套布（前片 + 後片）
    Gorro,
    /// 護膝布（M 與 XL 共用）
    Rodillera,
}

/// 四種裁片的數量（片）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricAmounts {
    pub gorro_nariz: Decimal,
    pub gorro_detras: Decimal,
    pub rodillera_m: Decimal,
    pub rodillera_xl: Decimal,
}

/// 布料庫存
pub type FabricInventory = FabricAmounts;

/// 布料用量
pub type FabricUsage = FabricAmounts;

impl FabricAmounts {
    pub fn zero() -> Self {
        Self::default()
    }

    /// 建構器模式：設置單一裁片數量
    pub fn with(mut self, fabric: Fabric, quantity: Decimal) -> Self {
        *self.get_mut(fabric) = quantity;
        self
    }

    pub fn get(&self, fabric: Fabric) -> Decimal {
        match fabric {
            Fabric::GorroNariz => self.gorro_nariz,
            Fabric::GorroDetras => self.gorro_detras,
            Fabric::RodilleraM => self.rodillera_m,
            Fabric::RodilleraXl => self.rodillera_xl,
        }
    }

    pub fn get_mut(&mut self, fabric: Fabric) -> &mut Decimal {
        match fabric {
            Fabric::GorroNariz => &mut self.gorro_nariz,
            Fabric::GorroDetras => &mut self.gorro_detras,
            Fabric::RodilleraM => &mut self.rodillera_m,
            Fabric::RodilleraXl => &mut self.rodillera_xl,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Fabric, Decimal)> + '_ {
        Fabric::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    pub fn accumulate(&mut self, other: &FabricAmounts) {
        for f in Fabric::ALL {
            *self.get_mut(f) = self.get(f).saturating_add(other.get(f));
        }
    }

    pub fn subtract(&mut self, other: &FabricAmounts) {
        for f in Fabric::ALL {
            *self.get_mut(f) = self.get(f).saturating_sub(other.get(f));
        }
    }

    /// 逐項相加；溢位時回傳 `None`
    pub fn checked_add(&self, other: &FabricAmounts) -> Option<Self> {
        let mut out = *self;
        for f in Fabric::ALL {
            *out.get_mut(f) = out.get(f).checked_add(other.get(f))?;
        }
        Some(out)
    }

    /// 逐項相減；溢位時回傳 `None`
    pub fn checked_sub(&self, other: &FabricAmounts) -> Option<Self> {
        let mut out = *self;
        for f in Fabric::ALL {
            *out.get_mut(f) = out.get(f).checked_sub(other.get(f))?;
        }
        Some(out)
    }
}

/// 產品的布料需求：每生產一單位產品消耗的裁片數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabricRequirement {
    pub fabric: Fabric,
    pub units_per_product: Decimal,
}

impl FabricRequirement {
    pub fn new(fabric: Fabric, units_per_product: Decimal) -> Self {
        Self {
            fabric,
            units_per_product,
        }
    }

    /// 每單位產品一片
    pub fn one(fabric: Fabric) -> Self {
        Self::new(fabric, Decimal::ONE)
    }
}
