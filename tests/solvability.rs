use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use slider_puzzle::{Board, Move, Solver};

fn scrambled(size: usize, steps: usize, rng: &mut StdRng) -> Board {
    let mut board = Board::goal(size);
    for _ in 0..steps {
        let moves: Vec<Move> = Move::ALL
            .into_iter()
            .filter(|&m| board.try_move(m).is_some())
            .collect();
        let &movement = moves.choose(rng).unwrap();
        board = board.try_move(movement).unwrap();
    }
    board
}

#[test]
fn solver_agrees_with_parity() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..8 {
        let board = scrambled(3, 15, &mut rng);
        assert!(board.is_solvable_by_parity());

        let solver = Solver::new(board.clone());
        assert!(solver.is_solvable());
        assert!(solver.moves() <= 15);
        assert!(solver.moves() >= board.manhattan() as i32);

        let twin = board.twin_with(&mut rng);
        assert!(!twin.is_solvable_by_parity());
        let solver = Solver::new(twin);
        assert!(!solver.is_solvable());
        assert_eq!(solver.moves(), -1);
        assert!(solver.solution().is_none());
    }
}

#[test]
fn moves_never_beat_the_walk_that_built_the_board() {
    let mut rng = StdRng::seed_from_u64(7);
    for size in 2..=4 {
        for steps in [0, 1, 2, 5, 9] {
            let board = scrambled(size, steps, &mut rng);
            let solver = Solver::new(board.clone());
            assert!(solver.is_solvable());
            assert!(solver.moves() <= steps as i32);
            assert_eq!(solver.moves() % 2, steps as i32 % 2);
            assert_eq!(solver.solution().unwrap().first(), Some(&board));
        }
    }
}
