use anyhow::Result;
use utoipa::OpenApi;

use crate::cli::DocFormat;
use crate::schemas::ApiDoc;

/// Renders the OpenAPI document in the requested format.
pub fn render_openapi(format: DocFormat) -> Result<String> {
    let doc = ApiDoc::openapi();
    let rendered = match format {
        DocFormat::Json => serde_json::to_string_pretty(&doc)?,
        DocFormat::Yaml => serde_yaml::to_string(&doc)?,
    };
    Ok(rendered)
}

pub fn print_openapi(format: DocFormat) -> Result<()> {
    println!("{}", render_openapi(format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_and_json_describe_the_same_paths() {
        let json: serde_json::Value =
            serde_json::from_str(&render_openapi(DocFormat::Json).unwrap()).unwrap();
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(&render_openapi(DocFormat::Yaml).unwrap()).unwrap();

        assert!(json["paths"]["/predict"].is_object());
        assert!(yaml["paths"]["/predict"].is_mapping());
    }
}
