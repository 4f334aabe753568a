use kata::{check, check_eq, eyre, Suite};

#[derive(Debug, Default)]
pub struct Calculator {
    memory: i64,
}

impl Calculator {
    fn add(&mut self, n: i64) -> i64 {
        self.memory += n;
        self.memory
    }

    fn divide(&mut self, n: i64) -> eyre::Result<i64> {
        eyre::ensure!(n != 0, "division by zero");
        self.memory /= n;
        Ok(self.memory)
    }
}

pub fn suite() -> Suite {
    kata::suite! {
        describe "calculator" {
            before_each |scope| {
                scope.insert(Calculator::default());
            }

            after_each |scope| {
                if let Some(calc) = scope.remove::<Calculator>() {
                    tracing::debug!("{}: memory={}", scope.description(), calc.memory);
                }
            }

            it "adds" |scope| {
                let calc = scope.get_mut::<Calculator>().unwrap();
                check_eq!(calc.add(2), 2);
                check_eq!(calc.add(3), 5);
            }

            it "starts from zero in every example" |scope| {
                check_eq!(scope.get::<Calculator>().map(|calc| calc.memory), Some(0));
            }

            context "division" {
                before_each |scope| {
                    scope.get_mut::<Calculator>().unwrap().add(12);
                }

                it "divides the memory" |scope| {
                    let calc = scope.get_mut::<Calculator>().unwrap();
                    check_eq!(calc.divide(4)?, 3);
                }

                it "rejects zero" |scope| {
                    let result = scope.get_mut::<Calculator>().unwrap().divide(0);
                    check!(result.is_err(), "dividing by zero should fail");
                }

                pending "rounds towards negative infinity" |scope| {
                    let calc = scope.get_mut::<Calculator>().unwrap();
                    calc.add(-25);
                    check_eq!(calc.divide(2)?, -7);
                }
            }
        }
    }
}
