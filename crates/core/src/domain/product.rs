use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read-only catalog entry. The filter engine never mutates these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub currency: String,
    pub category: String,
    pub image_url: String,
    pub rating: f64,
    pub reviews: u64,
}


#[cfg(test)]
mod tests {
    use super::Product;

    #[test]
    fn deserializes_catalog_record_shape() {
        let raw = r#"{
            "id": "echo-dot-5",
            "name": "Echo Dot (5th Gen)",
            "description": "Smart speaker with Alexa - Charcoal",
            "price": 4499,
            "currency": "INR",
            "category": "electronics",
            "image_url": "https://picsum.photos/300/300?random=1",
            "rating": 4.5,
            "reviews": 12500
        }"#;

        let product: Product = serde_json::from_str(raw).expect("product should decode");
        assert_eq!(product.id.as_str(), "echo-dot-5");
        assert_eq!(product.price, 4499);
        assert_eq!(product.reviews, 12500);
    }
}
