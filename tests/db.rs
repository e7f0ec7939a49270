mod common;

#[test]
fn test_database_is_removed_with_its_directory() {
    let dir = {
        let test_db = common::TestDb::new("test_db_lifecycle.db");
        let conn = test_db.pool().get();
        assert!(conn.is_ok());
        assert!(test_db.path().join("test_db_lifecycle.db").exists());
        test_db.path().to_path_buf()
    };

    assert!(!dir.exists());
}
