use unblur_core::{
    validate, CandidateFile, ErrorKind, FileOrigin, HandleRegistry, ValidationError,
    MAX_UPLOAD_BYTES,
};

fn file_of(media_type: &str, len: usize) -> CandidateFile {
    CandidateFile::new("photo", media_type, vec![0u8; len])
}

#[test]
fn non_image_types_are_rejected() {
    let registry = HandleRegistry::new();
    for media_type in ["text/plain", "application/pdf", "", "video/mp4", "application/octet-stream"] {
        let err = validate(file_of(media_type, 16), &registry).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAnImage, "type {media_type:?}");
    }
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn type_check_runs_before_size_check() {
    let registry = HandleRegistry::new();
    let err = validate(file_of("text/plain", MAX_UPLOAD_BYTES as usize + 1), &registry)
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::NotAnImage {
            media_type: "text/plain".to_string()
        }
    );
}

#[test]
fn size_limit_is_inclusive() {
    let registry = HandleRegistry::new();

    let at_limit = validate(file_of("image/png", MAX_UPLOAD_BYTES as usize), &registry);
    assert!(at_limit.is_ok());
    drop(at_limit);

    let err = validate(file_of("image/png", MAX_UPLOAD_BYTES as usize + 1), &registry)
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::TooLarge {
            byte_len: MAX_UPLOAD_BYTES + 1,
            max_bytes: 15 * 1024 * 1024,
        }
    );
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn twenty_megabyte_jpeg_is_too_large() {
    let registry = HandleRegistry::new();
    let err = validate(file_of("image/jpeg", 20 * 1024 * 1024), &registry).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TooLarge);
}

#[test]
fn accepted_file_gets_exactly_one_preview_handle() {
    let registry = HandleRegistry::new();
    let file = CandidateFile::new("cat.webp", "image/webp", b"webp-bytes".to_vec())
        .with_origin(FileOrigin::DragDrop);

    let staged = validate(file, &registry).expect("valid image");

    assert_eq!(registry.live_count(), 1);
    assert_eq!(staged.name(), "cat.webp");
    assert_eq!(staged.media_type(), "image/webp");
    assert_eq!(staged.origin(), FileOrigin::DragDrop);
    assert_eq!(staged.bytes().as_ref(), b"webp-bytes");
    assert_eq!(staged.byte_len(), 10);

    drop(staged);
    assert_eq!(registry.live_count(), 0);
}

#[test]
fn image_types_outside_the_picker_list_still_pass() {
    let registry = HandleRegistry::new();
    assert!(validate(file_of("image/gif", 4), &registry).is_ok());
}
