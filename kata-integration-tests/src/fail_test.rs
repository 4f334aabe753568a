use kata::{check_eq, eyre, Suite};

pub fn suite() -> Suite {
    kata::suite! {
        describe "intentional failures" {
            it "fails a check" {
                check_eq!(
                    "baz",
                    "bar",
                    "Intentional failure for CLI error state previews (enable with --features fail-test)"
                );
            }

            it "errors" {
                let port: u16 = "http".parse()?;
                tracing::info!("parsed {port}");
            }

            it "panics" {
                let empty: Vec<u8> = Vec::new();
                tracing::info!("{}", empty[0]);
            }

            after_each {
                eyre::ensure!(true, "teardown never fails here");
            }
        }
    }
}
