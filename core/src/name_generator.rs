//! Deterministic names for products, suppliers and companies.
//!
//! All generation is deterministic (same RNG seed = same names).

use crate::{model::ProductType, rng::RoutineRng};

pub struct NameGenerator;

impl NameGenerator {
    /// Product name drawn from the catalog of its type.
    pub fn product_name(product_type: ProductType, rng: &mut RoutineRng) -> &'static str {
        let names = match product_type {
            ProductType::FinishedGood => Self::finished_goods(),
            ProductType::Consumable   => Self::consumables(),
            ProductType::RawMaterial  => Self::raw_materials(),
        };
        names[rng.next_u64_below(names.len() as u64) as usize]
    }

    /// "Prefix Industry Suffix", e.g. "Northwind Metals Ltd".
    pub fn business_name(rng: &mut RoutineRng) -> String {
        let prefix = Self::business_prefixes();
        let industry = Self::business_industries();
        let suffix = Self::business_suffixes();
        format!(
            "{} {} {}",
            prefix[rng.next_u64_below(prefix.len() as u64) as usize],
            industry[rng.next_u64_below(industry.len() as u64) as usize],
            suffix[rng.next_u64_below(suffix.len() as u64) as usize],
        )
    }

    /// A (country, continent) pair.
    pub fn location(rng: &mut RoutineRng) -> (&'static str, &'static str) {
        let places = Self::countries();
        places[rng.next_u64_below(places.len() as u64) as usize]
    }

    fn finished_goods() -> &'static [&'static str] {
        &[
            "Laptop", "Smartphone", "Bicycle", "Washing Machine", "Desk Chair",
            "Television", "Electric Kettle", "Running Shoes", "Backpack", "Headphones",
            "Microwave Oven", "Vacuum Cleaner", "Wristwatch", "Tablet", "Camera",
        ]
    }

    fn consumables() -> &'static [&'static str] {
        &[
            "Coffee Beans", "Printer Paper", "Olive Oil", "Detergent", "Batteries",
            "Toner Cartridge", "Bottled Water", "Rice", "Flour", "Hand Soap",
            "Light Bulbs", "Cleaning Wipes",
        ]
    }

    fn raw_materials() -> &'static [&'static str] {
        &[
            "Steel Coil", "Copper Wire", "Aluminium Ingot", "Cotton Bale", "Crude Oil",
            "Timber", "Silicon Wafer", "Polyethylene Pellets", "Lithium Carbonate",
            "Natural Rubber", "Glass Sheet", "Cement",
        ]
    }

    fn business_prefixes() -> &'static [&'static str] {
        &[
            "Northwind", "Blue Ridge", "Summit", "Harbor", "Evergreen", "Atlas",
            "Pioneer", "Crescent", "Redwood", "Silverline", "Keystone", "Meridian",
        ]
    }

    fn business_industries() -> &'static [&'static str] {
        &[
            "Trading", "Metals", "Logistics", "Industries", "Supply", "Foods",
            "Electronics", "Materials", "Textiles", "Distribution",
        ]
    }

    fn business_suffixes() -> &'static [&'static str] {
        &["Ltd", "Inc", "GmbH", "SA", "Co", "Group", "Holdings"]
    }

    fn countries() -> &'static [(&'static str, &'static str)] {
        &[
            ("France", "Europe"),
            ("Germany", "Europe"),
            ("Italy", "Europe"),
            ("Poland", "Europe"),
            ("United States", "North America"),
            ("Canada", "North America"),
            ("Mexico", "North America"),
            ("Brazil", "South America"),
            ("Chile", "South America"),
            ("China", "Asia"),
            ("Japan", "Asia"),
            ("India", "Asia"),
            ("Vietnam", "Asia"),
            ("Nigeria", "Africa"),
            ("Morocco", "Africa"),
            ("Australia", "Oceania"),
        ]
    }
}
