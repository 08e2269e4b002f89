//! Razer product table - display name and category by USB product ID
//!
//! Used for naming devices found over raw USB and for classifying devices
//! bound to the kernel driver. Unknown products fall back to the driver name
//! (sysfs) or stay unclassified.

/// Razer USA USB vendor ID
pub const RAZER_VENDOR_ID: u16 = 0x1532;

pub const KEYBOARD: &str = "keyboard";
pub const KEYPAD: &str = "keypad";
pub const MOUSE: &str = "mouse";
pub const MOUSEMAT: &str = "mousemat";
pub const HEADSET: &str = "headset";
pub const CORE: &str = "core";
pub const MUG: &str = "mug";
pub const ACCESSORY: &str = "accessory";

/// A known Razer product.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Product {
    pub product_id: u16,
    pub name: &'static str,
    pub category: &'static str,
}

const fn product(product_id: u16, name: &'static str, category: &'static str) -> Product {
    Product {
        product_id,
        name,
        category,
    }
}

pub const PRODUCTS: &[Product] = &[
    // Mice
    product(0x0040, "Razer Naga 2014", MOUSE),
    product(0x0043, "Razer DeathAdder Chroma", MOUSE),
    product(0x0044, "Razer Mamba (Wired)", MOUSE),
    product(0x0045, "Razer Mamba (Wireless)", MOUSE),
    product(0x0050, "Razer Naga Hex V2", MOUSE),
    product(0x005C, "Razer DeathAdder Elite", MOUSE),
    // Keypads
    product(0x0111, "Razer Nostromo", KEYPAD),
    product(0x0113, "Razer Orbweaver", KEYPAD),
    product(0x0201, "Razer Tartarus", KEYPAD),
    product(0x0207, "Razer Orbweaver Chroma", KEYPAD),
    product(0x0208, "Razer Tartarus Chroma", KEYPAD),
    product(0x022B, "Razer Tartarus V2", KEYPAD),
    product(0x0244, "Razer Tartarus Pro", KEYPAD),
    // Keyboards
    product(0x011A, "Razer BlackWidow Ultimate 2013", KEYBOARD),
    product(0x011B, "Razer BlackWidow Stealth", KEYBOARD),
    product(0x0203, "Razer BlackWidow Chroma", KEYBOARD),
    product(0x0209, "Razer BlackWidow Chroma Tournament Edition", KEYBOARD),
    product(0x0216, "Razer BlackWidow X Chroma", KEYBOARD),
    product(0x0221, "Razer BlackWidow Chroma V2", KEYBOARD),
    product(0x0226, "Razer Huntsman Elite", KEYBOARD),
    product(0x0227, "Razer Huntsman", KEYBOARD),
    product(0x0241, "Razer BlackWidow 2019", KEYBOARD),
    // Everything else
    product(0x0215, "Razer Core", CORE),
    product(0x0504, "Razer Kraken 7.1 Chroma", HEADSET),
    product(0x0510, "Razer Kraken 7.1 V2", HEADSET),
    product(0x0C00, "Razer Firefly", MOUSEMAT),
    product(0x0F07, "Razer Chroma Mug Holder", MUG),
    product(0x0F08, "Razer Base Station Chroma", ACCESSORY),
];

pub fn lookup(product_id: u16) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.product_id == product_id)
}

/// Category implied by the kernel driver a device is bound to.
///
/// `razeraccessory` serves several kinds of device and is not mapped.
pub fn category_for_driver(driver: &str) -> Option<&'static str> {
    match driver {
        "razerkbd" => Some(KEYBOARD),
        "razermouse" => Some(MOUSE),
        "razerkraken" => Some(HEADSET),
        "razerfirefly" => Some(MOUSEMAT),
        "razermug" => Some(MUG),
        "razercore" => Some(CORE),
        _ => None,
    }
}

/// Best-known category: product table first, then the driver.
pub fn category(product_id: u16, driver: Option<&str>) -> Option<&'static str> {
    lookup(product_id)
        .map(|p| p.category)
        .or_else(|| driver.and_then(category_for_driver))
}
