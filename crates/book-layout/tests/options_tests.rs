use book_layout::*;

#[test]
fn test_default_options() {
    let options = PaginationOptions::default();
    assert_eq!(options.page_capacity, 5);
    assert_eq!(options.running_header, "VECTOR NEURAL NETWORKS");
    assert!(options.validate().is_ok());
}

#[test]
fn test_zero_capacity_rejected() {
    let options = PaginationOptions {
        page_capacity: 0,
        ..Default::default()
    };
    match options.validate() {
        Err(LayoutError::Config(msg)) => assert!(msg.contains("capacity")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let options = PaginationOptions {
        page_capacity: 8,
        running_header: "A BOOK".to_string(),
    };
    let temp_file = NamedTempFile::new().unwrap();

    options.save(temp_file.path()).await.unwrap();
    let loaded = PaginationOptions::load(temp_file.path()).await.unwrap();
    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_partial_options_file_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), r#"{"page_capacity": 3}"#).unwrap();

    let loaded = PaginationOptions::load(temp_file.path()).await.unwrap();
    assert_eq!(loaded.page_capacity, 3);
    assert_eq!(loaded.running_header, "VECTOR NEURAL NETWORKS");
}

#[tokio::test]
async fn test_load_invalid_options() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), r#"{"page_capacity": 0}"#).unwrap();
    assert!(matches!(
        PaginationOptions::load(temp_file.path()).await,
        Err(LayoutError::Config(_))
    ));
}
