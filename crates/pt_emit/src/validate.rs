use swc_common::{comments::SingleThreadedComments, sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{EsSyntax, Syntax};

use crate::EmitError;

/// Check that `source` parses as an ECMAScript module.
pub fn validate_module(source: &str, filename: &str) -> Result<(), EmitError> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );
    let comments = SingleThreadedComments::default();

    swc_ecma_parser::parse_file_as_module(
        &source_file,
        Syntax::Es(EsSyntax::default()),
        EsVersion::latest(),
        Some(&comments),
        &mut vec![],
    )
    .map_err(|e| EmitError::Invalid {
        filename: filename.to_string(),
        message: e.kind().msg().to_string(),
    })?;

    Ok(())
}
