use crate::{
    parse::{SectionKind, parse_parameters, split_sections},
    types::{SopDocument, SopMetadata},
};

/// Build the backend-facing descriptor for a parsed document.
///
/// Total and deterministic: parameter, example and troubleshooting extraction
/// is best-effort, and the same document always yields the same record.
pub fn build_metadata(doc: &SopDocument) -> SopMetadata {
    let sections = split_sections(&doc.content);
    let parameters = sections
        .get(SectionKind::Parameters)
        .map(parse_parameters)
        .unwrap_or_default();

    SopMetadata {
        name: doc.name.clone(),
        description: doc.description.clone(),
        parameters,
        examples: sections.get(SectionKind::Examples).map(String::from),
        troubleshooting: sections
            .get(SectionKind::Troubleshooting)
            .map(String::from),
    }
}
