use kata::{check_eq, check_ne, check_str_eq, fail, Suite};

pub fn suite() -> Suite {
    kata::suite! {
        describe "stack" {
            it "starts empty" {
                let stack: Vec<u8> = Vec::new();
                check_eq!(stack.len(), 0);
            }

            context "with two elements" {
                before_each |scope| {
                    scope.insert(vec!["first".to_string(), "second".to_string()]);
                }

                it "pops the last pushed element" |scope| {
                    let stack = scope.get_mut::<Vec<String>>().unwrap();
                    let Some(top) = stack.pop() else {
                        fail!("stack should not be empty");
                    };
                    check_str_eq!(top, "second");
                    check_eq!(stack.len(), 1);
                }

                it "keeps insertion order" |scope| {
                    let stack = scope.get::<Vec<String>>().unwrap();
                    check_ne!(stack.first(), stack.last());
                    check_str_eq!(stack.join(","), "first,second");
                }
            }

            pending "grows past its capacity";
        }
    }
}
