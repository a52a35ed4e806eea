//! Marketplace-style traits describing a composed scene.

use serde::Serialize;

use crate::data::{BlockFeatures, RingKind};
use crate::scene::Scene;

/// Slopes inside `±LEVEL_SLOPE` read as a level horizon.
const LEVEL_SLOPE: f32 = 0.5;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

/// One `{ trait_type, value, display_type? }` entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Attribute {
    pub trait_type: &'static str,
    pub value: AttributeValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_type: Option<&'static str>,
}

impl Attribute {
    fn text(trait_type: &'static str, value: impl Into<String>) -> Self {
        Self {
            trait_type,
            value: AttributeValue::Text(value.into()),
            display_type: None,
        }
    }

    fn number(trait_type: &'static str, value: impl Into<f64>) -> Self {
        Self {
            trait_type,
            value: AttributeValue::Number(value.into()),
            display_type: Some("number"),
        }
    }
}

/// Ordered trait list; serializes as `{"attributes": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AttributeSet {
    pub attributes: Vec<Attribute>,
}

impl AttributeSet {
    /// Reads the scene only; draws nothing from the entropy stream.
    pub fn derive(scene: &Scene, features: &BlockFeatures) -> Self {
        let sun_size = (scene.sun.diameter / scene.canvas.width * 100.0).round();
        let attributes = vec![
            Attribute::text("Palette", scene.palette.name()),
            Attribute::number("Moons", scene.moons.len() as u32),
            Attribute::number("Eclipsed Moons", scene.eclipsed_moons() as u32),
            Attribute::number("Rings", scene.rings.rings.len() as u32),
            Attribute::number("NFT Rings", features.count_of(RingKind::Nft) as u32),
            Attribute::number("ERC-20 Rings", features.count_of(RingKind::Erc20) as u32),
            Attribute::number("Sun Size", sun_size),
            Attribute::text("Horizon", horizon(scene.mountain_slope)),
        ];
        Self { attributes }
    }

    pub fn get(&self, trait_type: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|attr| attr.trait_type == trait_type)
            .map(|attr| &attr.value)
    }
}

/// Canvas y grows downward, so a negative slope climbs to the right.
fn horizon(slope: f32) -> &'static str {
    if slope <= -LEVEL_SLOPE {
        "Rising"
    } else if slope >= LEVEL_SLOPE {
        "Falling"
    } else {
        "Level"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Modifiers;
    use crate::data::{Block, Transaction};
    use crate::scene::{CanvasSize, SceneComposer};

    const NFT_MINT: &str = "0x40c10f19";
    const ERC20_TRANSFER: &str = "0xa9059cbb";

    fn block() -> Block {
        Block {
            number: Some(1),
            hash: "0x3c1f00aa".to_string(),
            gas_limit: 30_000_000,
            gas_used: 15_000_000,
            transactions: vec![
                Transaction::new(10).with_data(NFT_MINT),
                Transaction::new(20).with_data(ERC20_TRANSFER),
                Transaction::new(0).with_data(ERC20_TRANSFER),
                Transaction::new(30),
            ],
        }
    }

    fn derive(modifiers: &Modifiers) -> AttributeSet {
        let block = block();
        let features = BlockFeatures::extract(&block).unwrap();
        let scene = SceneComposer::new(&block, modifiers, CanvasSize::default())
            .unwrap()
            .compose();
        AttributeSet::derive(&scene, &features)
    }

    #[test]
    fn traits_come_in_fixed_order() {
        let set = derive(&Modifiers::preset());
        let names: Vec<&str> = set.attributes.iter().map(|a| a.trait_type).collect();
        assert_eq!(
            names,
            vec![
                "Palette",
                "Moons",
                "Eclipsed Moons",
                "Rings",
                "NFT Rings",
                "ERC-20 Rings",
                "Sun Size",
                "Horizon"
            ]
        );
    }

    #[test]
    fn counts_reflect_the_block() {
        let set = derive(&Modifiers::preset());
        assert_eq!(set.get("Palette"), Some(&AttributeValue::Text("Genesis".into())));
        assert_eq!(set.get("Moons"), Some(&AttributeValue::Number(3.0)));
        assert_eq!(set.get("Rings"), Some(&AttributeValue::Number(3.0)));
        assert_eq!(set.get("NFT Rings"), Some(&AttributeValue::Number(1.0)));
        assert_eq!(set.get("ERC-20 Rings"), Some(&AttributeValue::Number(1.0)));
        assert_eq!(set.get("Sun Size"), Some(&AttributeValue::Number(75.0)));
    }

    #[test]
    fn serializes_as_attribute_list() {
        let json = serde_json::to_value(derive(&Modifiers::preset())).unwrap();
        let list = json["attributes"].as_array().unwrap();

        assert_eq!(list.len(), 8);
        assert_eq!(list[0]["trait_type"], "Palette");
        assert!(list[0].get("display_type").is_none());
        assert_eq!(list[1]["display_type"], "number");
        assert_eq!(list[1]["value"], 3.0);
    }

    #[test]
    fn horizon_reads_slope_sign() {
        assert_eq!(horizon(-2.0), "Rising");
        assert_eq!(horizon(2.0), "Falling");
        assert_eq!(horizon(0.1), "Level");
        assert_eq!(horizon(-0.5), "Rising");
    }
}
