use nalgebra::DMatrix;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

/// Smith normal form `D = U * A * V` of an integer matrix `A`, with `U` and
/// `V` unimodular and `D` diagonal with `d_1 | d_2 | ...`, all `d_i >= 0`.
#[derive(Debug, Clone)]
pub struct SmithForm {
    pub diagonal: DMatrix<BigInt>,
    pub left: DMatrix<BigInt>,
    pub right: DMatrix<BigInt>,
}

impl SmithForm {
    /// Non-zero diagonal entries, in order.
    pub fn elementary_divisors(&self) -> Vec<BigInt> {
        let n = self.diagonal.nrows().min(self.diagonal.ncols());
        (0..n)
            .map(|i| self.diagonal[(i, i)].clone())
            .filter(|d| !d.is_zero())
            .collect()
    }

    /// Rank of the input matrix.
    pub fn rank(&self) -> usize {
        self.elementary_divisors().len()
    }
}

/// Compute the Smith normal form of `a` (rows are generators).
pub fn smith_normal_form(a: &DMatrix<BigInt>) -> SmithForm {
    let (rows, cols) = a.shape();
    let mut d = a.clone();
    let mut u = DMatrix::<BigInt>::identity(rows, rows);
    let mut v = DMatrix::<BigInt>::identity(cols, cols);

    'outer: for t in 0..rows.min(cols) {
        loop {
            let Some((pi, pj)) = smallest_nonzero(&d, t) else {
                break 'outer;
            };
            d.swap_rows(t, pi);
            u.swap_rows(t, pi);
            d.swap_columns(t, pj);
            v.swap_columns(t, pj);

            let mut clean = true;
            for i in (t + 1)..rows {
                let q = d[(i, t)].div_floor(&d[(t, t)]);
                if !q.is_zero() {
                    sub_row_multiple(&mut d, i, t, &q);
                    sub_row_multiple(&mut u, i, t, &q);
                }
                clean &= d[(i, t)].is_zero();
            }
            for j in (t + 1)..cols {
                let q = d[(t, j)].div_floor(&d[(t, t)]);
                if !q.is_zero() {
                    sub_column_multiple(&mut d, j, t, &q);
                    sub_column_multiple(&mut v, j, t, &q);
                }
                clean &= d[(t, j)].is_zero();
            }
            if !clean {
                continue;
            }

            // pivot must divide the rest of the submatrix
            let offender = ((t + 1)..rows)
                .find(|&i| ((t + 1)..cols).any(|j| !d[(i, j)].is_multiple_of(&d[(t, t)])));
            match offender {
                Some(i) => {
                    let minus_one = BigInt::from(-1);
                    sub_row_multiple(&mut d, t, i, &minus_one);
                    sub_row_multiple(&mut u, t, i, &minus_one);
                }
                None => break,
            }
        }
        if d[(t, t)].is_negative() {
            negate_row(&mut d, t);
            negate_row(&mut u, t);
        }
    }

    SmithForm {
        diagonal: d,
        left: u,
        right: v,
    }
}

fn smallest_nonzero(m: &DMatrix<BigInt>, t: usize) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for i in t..m.nrows() {
        for j in t..m.ncols() {
            if m[(i, j)].is_zero() {
                continue;
            }
            let better = match best {
                None => true,
                Some((bi, bj)) => m[(i, j)].abs() < m[(bi, bj)].abs(),
            };
            if better {
                best = Some((i, j));
            }
        }
    }
    best
}

/// row[target] -= q * row[source]
fn sub_row_multiple(m: &mut DMatrix<BigInt>, target: usize, source: usize, q: &BigInt) {
    for j in 0..m.ncols() {
        let value = &m[(target, j)] - q * &m[(source, j)];
        m[(target, j)] = value;
    }
}

/// col[target] -= q * col[source]
fn sub_column_multiple(m: &mut DMatrix<BigInt>, target: usize, source: usize, q: &BigInt) {
    for i in 0..m.nrows() {
        let value = &m[(i, target)] - q * &m[(i, source)];
        m[(i, target)] = value;
    }
}

fn negate_row(m: &mut DMatrix<BigInt>, row: usize) {
    for j in 0..m.ncols() {
        let value = -&m[(row, j)];
        m[(row, j)] = value;
    }
}
