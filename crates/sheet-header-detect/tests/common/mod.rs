use std::path::{Path, PathBuf};

pub fn write_fixture(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("fixture should be written");
    path
}

/// A consumer export with a report banner above the real headers.
pub fn consumer_export(rows: usize) -> String {
    let mut csv = String::from(
        "Gas Agency Consumer Export\nPrinted on,2024-10-01\n\nConsumer No,Name,Area,Route,Cylinders\n",
    );
    for index in 0..rows {
        csv.push_str(&format!(
            "{},Consumer {index},Ward {},R-{:02},{}\n",
            1000 + index,
            index % 7,
            index % 5,
            1 + index % 2
        ));
    }
    csv
}
