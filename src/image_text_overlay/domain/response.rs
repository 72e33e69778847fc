use serde::Serialize;

/// The response payload. Exactly one shape is produced per invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OverlayResponse {
    Inline {
        success: bool,
        b64_edited_image: String,
    },
    Link {
        success: bool,
        edited_image_url: Option<String>,
    },
    Failure {
        success: bool,
        error_message: String,
    },
}

impl OverlayResponse {
    pub fn inline(b64_edited_image: String) -> Self {
        OverlayResponse::Inline {
            success: true,
            b64_edited_image,
        }
    }

    pub fn link(edited_image_url: Option<String>) -> Self {
        OverlayResponse::Link {
            success: true,
            edited_image_url,
        }
    }

    pub fn failure(error_message: String) -> Self {
        OverlayResponse::Failure {
            success: false,
            error_message,
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            OverlayResponse::Inline { success, .. }
            | OverlayResponse::Link { success, .. }
            | OverlayResponse::Failure { success, .. } => *success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shapes() {
        assert_eq!(
            serde_json::to_value(OverlayResponse::inline("aGk=".into())).unwrap(),
            json!({"success": true, "b64_edited_image": "aGk="})
        );
        assert_eq!(
            serde_json::to_value(OverlayResponse::link(Some("https://u".into()))).unwrap(),
            json!({"success": true, "edited_image_url": "https://u"})
        );
        assert_eq!(
            serde_json::to_value(OverlayResponse::link(None)).unwrap(),
            json!({"success": true, "edited_image_url": null})
        );
        assert_eq!(
            serde_json::to_value(OverlayResponse::failure("boom".into())).unwrap(),
            json!({"success": false, "error_message": "boom"})
        );
    }
}
