mod calc;
#[cfg(feature = "fail-test")]
mod fail_test;
mod stack;

use kata::{eyre, Runner, Suite};

fn main() -> eyre::Result<()> {
    let mut suite = Suite::new();
    suite.append(calc::suite()).append(stack::suite());
    #[cfg(feature = "fail-test")]
    suite.append(fail_test::suite());

    let app = kata::App::new();
    app.run(Runner::new(), suite)?;
    Ok(())
}
