use super::Book;

// Several books carry uniform placeholder counts; supply exact data through
// CATALOG_PATH when the content provider needs it.
pub(super) fn books() -> Vec<Book> {
    vec![
        Book::new(
            "Genesis",
            vec![
                31, 25, 24, 26, 32, 22, 24, 22, 29, 32, 32, 20, 18, 24, 21, 16, 27, 33, 38, 18,
                34, 24,
            ],
        ),
        Book::new(
            "Exodus",
            vec![
                22, 25, 22, 31, 23, 30, 25, 32, 35, 29, 10, 51, 22, 31, 27, 36, 16, 27, 25, 26,
                36, 31, 33, 18, 40, 37, 21, 43, 46, 38, 18, 35, 23, 35, 35, 38, 29, 31, 43, 38,
            ],
        ),
        Book::new("Psalms", vec![20; 150]),
        Book::new("Proverbs", vec![30; 31]),
        Book::new(
            "John",
            vec![
                51, 25, 36, 54, 47, 71, 53, 59, 41, 42, 57, 50, 38, 31, 27, 33, 26, 40, 42, 31,
                25,
            ],
        ),
        Book::new(
            "Romans",
            vec![32, 29, 31, 25, 21, 23, 25, 39, 33, 21, 36, 21, 14, 23, 33, 27],
        ),
        Book::new("Philippians", vec![30, 30, 21, 23]),
    ]
}
