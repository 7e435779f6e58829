use prost::Message;
use prost_types::compiler::{
    code_generator_response::{Feature, File},
    CodeGeneratorRequest, CodeGeneratorResponse,
};

use crate::{
    diagnostics::Generated,
    error::GenError,
    generator::generate,
    index::FileSet,
    options::GeneratorOptions,
};

/// Answers one protoc request. Request-level problems go into the
/// response's `error` field, which is how protoc expects plugins to fail.
pub fn process_request(request: &CodeGeneratorRequest) -> Generated<CodeGeneratorResponse> {
    let mut response = CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    };

    let generated = GeneratorOptions::parse(request.parameter()).and_then(|options| {
        let files = FileSet::from_descriptors(&request.proto_file);
        generate(&files, &request.file_to_generate, &options)
    });

    match generated {
        Ok(generated) => generated.map(|outputs| {
            response.file = outputs
                .into_iter()
                .flat_map(|output| output.files)
                .map(|out| File {
                    name:    Some(out.name),
                    content: Some(out.content),
                    ..Default::default()
                })
                .collect();
            response
        }),
        Err(err) => {
            response.error = Some(err.to_string());
            Generated::new(response)
        }
    }
}

/// Decodes a serialized request, runs it and returns the serialized
/// response. Only an undecodable request is an `Err`.
pub fn run_plugin(input: &[u8]) -> Result<Vec<u8>, GenError> {
    let request = CodeGeneratorRequest::decode(input)?;
    let response = process_request(&request).output;
    Ok(response.encode_to_vec())
}
