//! Print the OpenAPI document as pretty JSON, or YAML with `--yaml`.

use std::process::ExitCode;

use rota::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> ExitCode {
    let yaml = std::env::args().skip(1).any(|arg| arg == "--yaml");
    let doc = ApiDoc::openapi();
    let rendered = if yaml {
        doc.to_yaml().map_err(|err| err.to_string())
    } else {
        doc.to_pretty_json().map_err(|err| err.to_string())
    };
    match rendered {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to render OpenAPI document: {err}");
            ExitCode::FAILURE
        }
    }
}
