use crate::error::{GuideError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub name: String,
    pub description: String,
}

/// A validated culinary guide for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulinaryGuide {
    pub location_name: String,
    pub must_try_dishes: Vec<Dish>,
    pub etiquette_tip: String,
    pub restaurant_suggestion: String,
    /// Only used to drive the image stage.
    pub image_gen_prompt: String,
}

impl CulinaryGuide {
    /// Parses the text payload returned by the model and checks it against the
    /// guide schema. Missing or mistyped fields reject the whole payload.
    pub fn from_payload(text: &str) -> Result<Self> {
        let guide: CulinaryGuide = serde_json::from_str(text.trim())
            .map_err(|e| GuideError::InvalidGuidePayload(e.to_string()))?;
        guide.validate()?;
        Ok(guide)
    }

    fn validate(&self) -> Result<()> {
        if self.must_try_dishes.is_empty() {
            return Err(GuideError::InvalidGuidePayload(
                "mustTryDishes is empty".into(),
            ));
        }
        if self.image_gen_prompt.trim().is_empty() {
            return Err(GuideError::InvalidGuidePayload(
                "imageGenPrompt is blank".into(),
            ));
        }
        Ok(())
    }

    /// The response schema sent with every guide request.
    pub fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "locationName": { "type": "STRING" },
                "mustTryDishes": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": { "type": "STRING" },
                            "description": { "type": "STRING" }
                        },
                        "required": ["name", "description"]
                    }
                },
                "etiquetteTip": { "type": "STRING" },
                "restaurantSuggestion": { "type": "STRING" },
                "imageGenPrompt": { "type": "STRING" }
            },
            "required": [
                "locationName",
                "mustTryDishes",
                "etiquetteTip",
                "restaurantSuggestion",
                "imageGenPrompt"
            ]
        })
    }
}

/// Instruction text for a trimmed, non-empty location.
pub fn guide_prompt(location: &str) -> String {
    format!(
        "You are a culinary travel expert. Create a food guide for \"{location}\". \
         Recommend 3 to 5 must-try local dishes, each with a name and a short, vivid description. \
         Add one dining etiquette tip a visitor should know and one suggestion for a restaurant, \
         street-food area or market worth visiting. Finally, write a detailed prompt for an image \
         generation model describing a photorealistic, appetizing close-up of the region's \
         signature dish. Use the resolved place name for locationName."
    )
}
