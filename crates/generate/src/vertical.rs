//! Static retail-vertical catalog for the demo generators.
//!
//! Each vertical carries a SKU prefix, a realistic price band, a
//! supply-price margin band, and the word pools product names are
//! assembled from. The catalog is compiled in and read-only; generators
//! take a `&'static Vertical` and keep their own uniqueness state.

/// One retail vertical's generation parameters.
#[derive(Debug)]
pub struct Vertical {
    pub name: &'static str,
    /// SKU prefix, three uppercase letters.
    pub prefix: &'static str,
    /// Retail price band (min, max) before the .95/.99 ending.
    pub price_range: (f64, f64),
    /// Supply price as a fraction of retail (min, max).
    pub supply_margin: (f64, f64),
    pub products: &'static [&'static str],
    pub adjectives: &'static [&'static str],
    /// Fictional house brands; empty for verticals that name products
    /// by material instead.
    pub brands: &'static [&'static str],
    pub materials: &'static [&'static str],
}

pub const VERTICALS: &[Vertical] = &[
    Vertical {
        name: "apparel",
        prefix: "APP",
        price_range: (15.0, 120.0),
        supply_margin: (0.35, 0.55),
        products: &[
            "T-Shirt", "Hoodie", "Jeans", "Chinos", "Jacket", "Cardigan", "Dress", "Skirt",
            "Polo", "Beanie", "Scarf", "Socks", "Belt", "Shorts", "Blazer",
        ],
        adjectives: &[
            "Classic", "Slim Fit", "Relaxed", "Vintage", "Essential", "Premium", "Everyday",
            "Oversized", "Tailored", "Lightweight",
        ],
        brands: &[],
        materials: &[
            "Cotton", "Linen", "Denim", "Merino", "Fleece", "Corduroy", "Canvas",
        ],
    },
    Vertical {
        name: "electronics",
        prefix: "ELE",
        price_range: (25.0, 900.0),
        supply_margin: (0.6, 0.8),
        products: &[
            "Headphones", "Bluetooth Speaker", "Power Bank", "Webcam", "Keyboard", "Mouse",
            "Monitor", "Soundbar", "Smart Plug", "Router", "Charging Dock", "Earbuds",
        ],
        adjectives: &[
            "Wireless", "Compact", "Portable", "Ultra", "Pro", "Gaming", "Noise-Cancelling",
            "Fast-Charge", "HD", "Smart",
        ],
        brands: &[
            "Voltaic", "Nimbus", "Audiohaus", "Brightwave", "Corelink", "Zenith",
        ],
        materials: &[],
    },
    Vertical {
        name: "home",
        prefix: "HOM",
        price_range: (10.0, 250.0),
        supply_margin: (0.4, 0.6),
        products: &[
            "Throw Pillow", "Table Lamp", "Candle", "Vase", "Cutting Board", "Serving Bowl",
            "Wall Clock", "Planter", "Blanket", "Coaster Set", "Mirror", "Storage Basket",
        ],
        adjectives: &[
            "Handcrafted", "Rustic", "Modern", "Scandinavian", "Minimalist", "Artisan",
            "Coastal", "Industrial",
        ],
        brands: &[],
        materials: &[
            "Oak", "Ceramic", "Rattan", "Marble", "Walnut", "Stoneware", "Bamboo", "Brass",
        ],
    },
    Vertical {
        name: "beauty",
        prefix: "BTY",
        price_range: (8.0, 95.0),
        supply_margin: (0.3, 0.5),
        products: &[
            "Face Serum", "Moisturiser", "Cleanser", "Lip Balm", "Body Scrub", "Hand Cream",
            "Shampoo", "Conditioner", "Face Mask", "Toner", "Body Lotion", "Eye Cream",
        ],
        adjectives: &[
            "Hydrating", "Revitalising", "Soothing", "Brightening", "Nourishing", "Gentle",
            "Botanical", "Overnight",
        ],
        brands: &[
            "Lumen & Leaf", "Petal Theory", "Maison Verde", "Gloam", "Aurelia",
        ],
        materials: &[],
    },
    Vertical {
        name: "liquor",
        prefix: "LIQ",
        price_range: (12.0, 180.0),
        supply_margin: (0.55, 0.75),
        products: &[
            "Gin", "Whisky", "Vodka", "Rum", "Tequila", "Bourbon", "Pinot Noir", "Shiraz",
            "Chardonnay", "Pale Ale", "Stout", "Cider",
        ],
        adjectives: &[
            "Small Batch", "Barrel-Aged", "Single Malt", "Reserve", "Dry", "Smoked",
            "Limited Release", "Cask Strength",
        ],
        brands: &[
            "Blackwater", "Copper Fern", "Old Meridian", "Harbourline", "Stonepost",
        ],
        materials: &[],
    },
];

/// Look up a vertical by its SKU prefix (`APP`, `ELE`, `HOM`, `BTY`,
/// `LIQ`).
pub fn vertical_by_prefix(prefix: &str) -> Option<&'static Vertical> {
    VERTICALS.iter().find(|v| v.prefix == prefix)
}
