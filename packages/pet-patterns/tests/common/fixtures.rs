//! Canned programs

use super::builders::PetGraphFixture;

/// `main` calls `fib`, whose two recursive halves feed a sum
///
/// ```text
/// main (1-12)
///   call (8-10)
///     fib (40-50)
///       first (43-44)  fib(n-1)    reads n
///       second (45-46) fib(n-2)    reads n
///       sum (47-49)    reads x, y
///       init (41-42)   writes n
/// ```
pub fn fib_program() -> PetGraphFixture {
    PetGraphFixture::new()
        .func(0, "main", 1, 12)
        .cu(1, 8, 10, 50)
        .func(2, "fib", 40, 50)
        .cu(3, 43, 44, 500)
        .cu(4, 45, 46, 500)
        .cu(5, 47, 49, 20)
        .cu(6, 41, 42, 10)
        .children(0, &[1])
        .children(1, &[2])
        .children(2, &[3, 4, 5, 6])
        .local(3, "x")
        .local(4, "y")
        .local(6, "n")
        .writes(6, 41)
        .reads(3, 43)
        .writes(3, 44)
        .reads(4, 45)
        .writes(4, 46)
        .reads(5, 48)
        .call(3, "fib", 44)
        .call(4, "fib", 46)
        .raw(43, 41, "n")
        .raw(45, 41, "n")
        .raw(48, 44, "x")
        .raw(48, 46, "y")
}

/// `main` with an independent loop and a reduction loop
///
/// ```text
/// main (1-40)
///   independent loop (2-20, 100 iterations)
///     a (3-4), b (5-6)
///   sum loop (22-30, 50 iterations)
///     acc (23-29) local `sum`
/// ```
pub fn loop_program() -> PetGraphFixture {
    PetGraphFixture::new()
        .func(0, "main", 1, 40)
        .lp(1, 2, 20, 100)
        .cu(2, 3, 4, 10)
        .cu(3, 5, 6, 10)
        .lp(4, 22, 30, 50)
        .cu(5, 23, 29, 8)
        .children(0, &[1, 4])
        .children(1, &[2, 3])
        .children(4, &[5])
        .local(5, "sum")
        .reduction(22, "sum", "+")
}

/// Two-level do-all nest under `main`
///
/// ```text
/// main (1-40)
///   outer loop (2-20, 100 iterations)
///     inner loop (3-10, 1000 iterations)
///       body (4-9)
/// ```
pub fn nested_loop_program() -> PetGraphFixture {
    PetGraphFixture::new()
        .func(0, "main", 1, 40)
        .lp(1, 2, 20, 100)
        .lp(2, 3, 10, 1000)
        .cu(3, 4, 9, 40)
        .children(0, &[1])
        .children(1, &[2])
        .children(2, &[3])
}
