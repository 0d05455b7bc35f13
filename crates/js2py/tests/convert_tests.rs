use js2py::{Error, Result, Transpiler};
use js2py_rewrite::{PatternRewriter, RuleSet};
use pretty_assertions::assert_eq;

fn convert(source: &str) -> Result<String> {
    Transpiler::new()?.convert(source)
}

#[test]
fn conditional_end_to_end() -> Result<()> {
    let target = convert("if (a === 1) { return a; } else { return 0; }")?;
    assert_eq!(target, "if a == 1:\n  return a\nelse:\n  return 0");
    Ok(())
}

#[test]
fn bignumber_rewrite_feeds_code_generation() -> Result<()> {
    assert_eq!(convert("total.plus(delta);")?, "total + delta");
    assert_eq!(convert("var x = new BigN(10);")?, "x = 10");
    assert_eq!(
        convert("balance.times(rate.plus(1));")?,
        "balance * (rate + 1)"
    );
    Ok(())
}

#[test]
fn literals_round_trip_verbatim() -> Result<()> {
    assert_eq!(convert("var pi = 3.14159265358979;")?, "pi = 3.14159265358979");
    assert_eq!(convert("var x = 1.50;")?, "x = 1.50");
    assert_eq!(convert("var nothing = null;")?, "nothing = None");
    Ok(())
}

#[test]
fn counting_loop_against_while_fallback() -> Result<()> {
    assert_eq!(
        convert("for (var i = 0; i < 10; i++) { f(i); }")?,
        "for i in range(0, 10):\n  f(i)"
    );
    assert_eq!(
        convert("for (var i = 10; i > 0; i--) { f(i); }")?,
        "i = 10\nwhile i > 0:\n  f(i)\n  i -= 1"
    );
    Ok(())
}

#[test]
fn class_translation_end_to_end() -> Result<()> {
    let source = "class Account extends Base {\n  constructor(balance) { super(balance); this.balance = balance; }\n  deposit(amount) { this.balance = this.balance.plus(amount); }\n}";
    let expected = concat!(
        "class Account(Base):\n",
        "  def __init__(self, balance):\n",
        "    super().__init__(balance)\n",
        "    self.balance = balance\n",
        "\n",
        "  def deposit(self, amount):\n",
        "    self.balance = self.balance + amount\n",
        "\n",
    );
    assert_eq!(convert(source)?, expected);
    Ok(())
}

#[test]
fn empty_shapes_render_their_placeholders() -> Result<()> {
    assert_eq!(convert("var o = {};")?, "o = {}");
    assert_eq!(convert("function f() {}")?, "def f():\n  pass\n");
    Ok(())
}

#[test]
fn program_statements_join_line_by_line() -> Result<()> {
    assert_eq!(convert("var a = 1;\nvar b = 2;\na + b;")?, "a = 1\nb = 2\na + b");
    Ok(())
}

#[test]
fn parse_failure_is_all_or_nothing() {
    let result = convert("function (");
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[test]
fn unsupported_constructs_abort() {
    let result = convert("try { f(); } catch (e) {}");
    assert!(matches!(result, Err(Error::Unsupported(_))));
}

#[test]
fn pass_order_is_configurable_and_deterministic() -> Result<()> {
    let pairs_a = [("_1.plus(_2)", "_1 + _2")];
    let pairs_b = [("_1 + _2", "add(_1, _2)")];

    // plus → `+`, then `+` → add(): both passes fire in sequence.
    let mut chained = Transpiler::bare()
        .with_pass(Box::new(PatternRewriter::new(
            "plus-to-operator",
            RuleSet::compile(&pairs_a)?,
        )))
        .with_pass(Box::new(PatternRewriter::new(
            "operator-to-helper",
            RuleSet::compile(&pairs_b)?,
        )));
    assert_eq!(chained.convert("a.plus(b);")?, "add(a, b)");

    // Reversed, the helper pass sees no `+` yet and only the first fires.
    let mut reversed = Transpiler::bare()
        .with_pass(Box::new(PatternRewriter::new(
            "operator-to-helper",
            RuleSet::compile(&pairs_b)?,
        )))
        .with_pass(Box::new(PatternRewriter::new(
            "plus-to-operator",
            RuleSet::compile(&pairs_a)?,
        )));
    assert_eq!(reversed.convert("a.plus(b);")?, "a + b");
    Ok(())
}

#[test]
fn template_and_update_supplements() -> Result<()> {
    assert_eq!(convert("`total: ${t}`;")?, "'total: %f' % (t)");
    assert_eq!(convert("count++;")?, "count += 1");
    Ok(())
}

#[test]
fn untranslatable_operator_flags_partial_output() -> Result<()> {
    let target = convert("typeof x;")?;
    assert_eq!(target, "??x");
    Ok(())
}
