/// Static explanation of every formula, shown by `talent-score formulas` and
/// the form's formulas overlay.
pub const FORMULA_GUIDE: &str = "\
How the final score is calculated
=================================

1. Special criteria average (per judge)
   S = (c1 + c2 + ... + cn) / n

2. Judge average (per judge)
   A = (Creativity + Quality + S) / 3
   A half-weight judge counts for half: A = A / 2.
   Excluded judges still get an average, shown for reference only.

3. Judges average
   J = mean of A over the judges that are not excluded.
   At least one judge must take part.

4. Audience average
   V = Total points / Voters      (0 when nobody voted)

5. Control constant
   M = max(10 × active judges, M₀)      M₀ is configurable, default 20

6. Audience effective
   E = (Voters × V + M × J) / (Voters + M)
   With few voters E stays close to J; with many voters it approaches V.
   With no voters E = J.

7. Final score
   Final = J × 0.75 + E × 0.25

Judge bias flags
----------------
Each active judge's average is compared with the other active judges:
   z = (A - mean) / standard deviation      (z = 0 when all judges agree)
   🟢 |z| ≤ 1      in line with the panel
   🟡 1 < |z| ≤ 2  noticeably off the panel
   🔴 |z| > 2      strong outlier
Excluded judges are always shown green with z = 0.
";

/// Guide text split into lines, for widgets that render line by line.
pub fn formula_guide_lines() -> impl Iterator<Item = &'static str> {
    FORMULA_GUIDE.lines()
}
